//! Storage and lookup ports.

use async_trait::async_trait;
use charsheet_domain::{CharacterId, EquippedItem};

use super::error::StoreError;

// =============================================================================
// Key-Value Storage
// =============================================================================

/// Async key-value storage of JSON documents.
///
/// A missing key reads as `Ok(None)`; removing a missing key succeeds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// =============================================================================
// Inventory
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentPort: Send + Sync {
    /// Items the character currently has equipped.
    async fn equipped_items(&self, character_id: CharacterId) -> Result<Vec<EquippedItem>, StoreError>;
}
