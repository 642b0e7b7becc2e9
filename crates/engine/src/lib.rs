//! Charsheet Engine library.
//!
//! Runtime side of the character sheet: holds one character in memory,
//! applies commands through the domain rules and persists the records.
//!
//! ## Structure
//!
//! - `entities/` - Typed record access over the key-value port
//! - `use_cases/` - The character engine
//! - `infrastructure/` - Ports and their adapters (stores, clock, random, retry, settings)

pub mod entities;
pub mod infrastructure;
pub mod use_cases;

pub use infrastructure::error::EngineError;
pub use use_cases::{CharacterEngine, EnginePorts};
