//! Character record operations.

use std::sync::Arc;

use charsheet_domain::{Character, CharacterId, ClassResourcesState, MagicState};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::infrastructure::ports::{KeyValueStore, StoreError};

pub fn character_key(id: CharacterId) -> String {
    format!("charsheet:character:{}", id)
}

pub fn magic_key(id: CharacterId) -> String {
    format!("charsheet:magic:{}", id)
}

pub fn class_resources_key(id: CharacterId) -> String {
    format!("charsheet:class_resources:{}", id)
}

/// Typed access to the three records stored per character.
#[derive(Clone)]
pub struct CharacterRecords {
    store: Arc<dyn KeyValueStore>,
}

impl CharacterRecords {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get_character(&self, id: CharacterId) -> Result<Option<Character>, StoreError> {
        self.read(&character_key(id)).await
    }

    pub async fn get_magic(&self, id: CharacterId) -> Result<Option<MagicState>, StoreError> {
        self.read(&magic_key(id)).await
    }

    pub async fn get_class_resources(
        &self,
        id: CharacterId,
    ) -> Result<Option<ClassResourcesState>, StoreError> {
        self.read(&class_resources_key(id)).await
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub async fn save_character(&self, character: &Character) -> Result<(), StoreError> {
        self.write(&character_key(character.id), character).await
    }

    pub async fn save_magic(&self, id: CharacterId, magic: &MagicState) -> Result<(), StoreError> {
        self.write(&magic_key(id), magic).await
    }

    pub async fn save_class_resources(
        &self,
        id: CharacterId,
        resources: &ClassResourcesState,
    ) -> Result<(), StoreError> {
        self.write(&class_resources_key(id), resources).await
    }

    /// Remove every record of the character. Each key is attempted even if
    /// an earlier one fails; failures are logged and the first is returned.
    pub async fn delete_all(&self, id: CharacterId) -> Result<(), StoreError> {
        let mut first_error = None;
        for key in [character_key(id), magic_key(id), class_resources_key(id)] {
            if let Err(e) = self.store.remove(&key).await {
                tracing::warn!(character_id = %id, key = %key, error = %e, "Failed to remove record");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.store.get(key).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| StoreError::serialization(format!("{}: {}", key, e))),
            None => Ok(None),
        }
    }

    async fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_value(value).map_err(StoreError::serialization)?;
        self.store.set(key, json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_store::MemoryStore;
    use crate::infrastructure::ports::MockKeyValueStore;
    use charsheet_domain::{AbilityScores, CharacterClass};
    use chrono::Utc;

    fn wizard() -> Character {
        Character::new_level_one(
            "Elminster",
            CharacterClass::Wizard,
            AbilityScores::from_bases([8, 14, 13, 16, 12, 10]),
            Utc::now(),
        )
    }

    #[test]
    fn keys_are_namespaced_per_character() {
        let id = CharacterId::from_uuid(uuid::Uuid::nil());
        assert_eq!(
            character_key(id),
            "charsheet:character:00000000-0000-0000-0000-000000000000"
        );
        assert!(magic_key(id).starts_with("charsheet:magic:"));
        assert!(class_resources_key(id).starts_with("charsheet:class_resources:"));
    }

    #[tokio::test]
    async fn save_and_read_back() {
        let store = Arc::new(MemoryStore::new());
        let records = CharacterRecords::new(store.clone());
        let character = wizard();
        let magic = MagicState::default_for(&character);

        records.save_character(&character).await.unwrap();
        records.save_magic(character.id, &magic).await.unwrap();

        assert_eq!(records.get_character(character.id).await.unwrap(), Some(character.clone()));
        assert_eq!(records.get_magic(character.id).await.unwrap(), Some(magic));
        assert_eq!(records.get_class_resources(character.id).await.unwrap(), None);

        records.delete_all(character.id).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn bad_payload_is_a_serialization_error() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Ok(Some(serde_json::json!({"level": "high"}))));
        let records = CharacterRecords::new(Arc::new(store));

        let err = records.get_character(CharacterId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn delete_all_tries_every_key() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_remove()
            .times(3)
            .returning(|key| {
                if key.starts_with("charsheet:magic:") {
                    Err(StoreError::backend("remove", "locked"))
                } else {
                    Ok(())
                }
            });
        let records = CharacterRecords::new(Arc::new(store));

        let err = records.delete_all(CharacterId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend { .. }));
    }
}
