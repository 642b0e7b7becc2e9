//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Everything else is concrete
//! types. Ports exist for:
//! - Record storage (in-memory map, JSON files, or anything key-value)
//! - Equipment lookup (the inventory owns equipped items)
//! - Clock/Random (for testing)

mod error;
mod store;
mod testing;

// =============================================================================
// Storage Ports
// =============================================================================
pub use store::{EquipmentPort, KeyValueStore};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use store::{MockEquipmentPort, MockKeyValueStore};

#[cfg(test)]
pub use testing::{MockClockPort, MockRandomPort};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{roll_die, ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::StoreError;
