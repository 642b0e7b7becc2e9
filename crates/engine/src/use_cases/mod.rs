//! Use cases - User story orchestration.
//!
//! Use cases orchestrate across entity modules and ports to fulfill user stories.

pub mod character_engine;

pub use character_engine::{CharacterEngine, EnginePorts};
