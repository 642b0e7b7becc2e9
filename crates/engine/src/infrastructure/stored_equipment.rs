//! Equipment adapter backed by the key-value store.

use std::sync::Arc;

use async_trait::async_trait;
use charsheet_domain::{CharacterId, EquippedItem};

use crate::infrastructure::ports::{EquipmentPort, KeyValueStore, StoreError};

pub fn equipment_key(id: CharacterId) -> String {
    format!("charsheet:equipment:{}", id)
}

/// Reads the equipped-items list stored next to the character records.
/// A character with no stored list has nothing equipped.
pub struct StoredEquipment {
    store: Arc<dyn KeyValueStore>,
}

impl StoredEquipment {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Replace the character's equipped items.
    pub async fn set_equipped(&self, id: CharacterId, items: &[EquippedItem]) -> Result<(), StoreError> {
        let value = serde_json::to_value(items).map_err(|e| StoreError::serialization(e.to_string()))?;
        self.store.set(&equipment_key(id), value).await
    }
}

#[async_trait]
impl EquipmentPort for StoredEquipment {
    async fn equipped_items(&self, character_id: CharacterId) -> Result<Vec<EquippedItem>, StoreError> {
        match self.store.get(&equipment_key(character_id)).await? {
            Some(value) => serde_json::from_value(value).map_err(|e| StoreError::serialization(e.to_string())),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_store::MemoryStore;
    use charsheet_domain::{ArmorDetails, EquipmentCategory};
    use serde_json::json;

    #[tokio::test]
    async fn missing_list_is_empty() {
        let equipment = StoredEquipment::new(Arc::new(MemoryStore::new()));
        assert!(equipment.equipped_items(CharacterId::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stored_list_is_returned() {
        let store = Arc::new(MemoryStore::new());
        let equipment = StoredEquipment::new(store.clone());
        let id = CharacterId::new();
        let shield = EquippedItem {
            id: "shield".into(),
            name: "Shield".into(),
            category: EquipmentCategory::Shield,
            armor: Some(ArmorDetails {
                base_ac: 2,
                add_dex_modifier: false,
                max_dex_bonus: None,
            }),
        };
        equipment.set_equipped(id, std::slice::from_ref(&shield)).await.unwrap();

        assert_eq!(equipment.equipped_items(id).await.unwrap(), vec![shield]);
    }

    #[tokio::test]
    async fn malformed_list_is_a_serialization_error() {
        let store = Arc::new(MemoryStore::new());
        let id = CharacterId::new();
        store.set(&equipment_key(id), json!({"not": "a list"})).await.unwrap();

        let err = StoredEquipment::new(store).equipped_items(id).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
