//! Infrastructure: ports and their adapters.

pub mod clock;
pub mod error;
pub mod file_store;
pub mod memory_store;
pub mod ports;
pub mod retry;
pub mod settings;
pub mod stored_equipment;
