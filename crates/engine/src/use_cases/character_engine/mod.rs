//! Character engine use case.
//!
//! One `CharacterEngine` is built when a character is loaded and dropped
//! when it is unloaded. It owns the character, its magic and its class
//! resources; every command mutates them in memory and marks the engine
//! dirty. [`CharacterEngine::flush`] writes the records back.

mod commands;
mod level_up;

use std::sync::Arc;

use charsheet_domain::{
    Character, CharacterId, ClassResourcesState, EquippedItem, MagicState,
};
use chrono::{DateTime, Utc};

use crate::entities::{character_key, CharacterRecords};
use crate::infrastructure::error::EngineError;
use crate::infrastructure::ports::{
    roll_die, ClockPort, EquipmentPort, KeyValueStore, RandomPort, StoreError,
};
use crate::infrastructure::retry::{retry_with_backoff, RetryConfig};

/// Collaborators an engine needs.
#[derive(Clone)]
pub struct EnginePorts {
    pub store: Arc<dyn KeyValueStore>,
    pub equipment: Arc<dyn EquipmentPort>,
    pub random: Arc<dyn RandomPort>,
    pub clock: Arc<dyn ClockPort>,
    pub retry: RetryConfig,
}

pub struct CharacterEngine {
    character: Character,
    magic: MagicState,
    resources: ClassResourcesState,
    equipped: Vec<EquippedItem>,
    dirty: bool,
    last_error: Option<String>,
    records: CharacterRecords,
    ports: EnginePorts,
}

impl CharacterEngine {
    /// Load a stored character. Missing magic or class-resource records are
    /// synthesized from the rules tables and the engine starts dirty.
    pub async fn load(id: CharacterId, ports: EnginePorts) -> Result<Self, EngineError> {
        let records = CharacterRecords::new(ports.store.clone());

        let character = records
            .get_character(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Character", character_key(id)))?;

        let mut dirty = false;
        let magic = match records.get_magic(id).await? {
            Some(magic) => magic,
            None => {
                tracing::debug!(character_id = %id, "No magic record, using defaults");
                dirty = true;
                MagicState::default_for(&character)
            }
        };
        let resources = match records.get_class_resources(id).await? {
            Some(resources) => resources,
            None => {
                tracing::debug!(character_id = %id, "No class resources record, using defaults");
                dirty = true;
                ClassResourcesState::for_level(character.class, character.level)
            }
        };

        let equipped = match ports.equipment.equipped_items(id).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(character_id = %id, error = %e, "Equipment lookup failed, assuming none");
                Vec::new()
            }
        };

        tracing::info!(
            character_id = %id,
            name = %character.name,
            level = character.level,
            "Character loaded"
        );

        Ok(Self {
            character,
            magic,
            resources,
            equipped,
            dirty,
            last_error: None,
            records,
            ports,
        })
    }

    /// Start an engine for a character that has never been stored.
    pub fn create(character: Character, ports: EnginePorts) -> Self {
        let magic = MagicState::default_for(&character);
        let resources = ClassResourcesState::for_level(character.class, character.level);
        tracing::info!(character_id = %character.id, name = %character.name, "Character created");
        Self {
            character,
            magic,
            resources,
            equipped: Vec::new(),
            dirty: true,
            last_error: None,
            records: CharacterRecords::new(ports.store.clone()),
            ports,
        }
    }

    /// Remove every stored record of a character.
    pub async fn delete_all(store: Arc<dyn KeyValueStore>, id: CharacterId) -> Result<(), EngineError> {
        CharacterRecords::new(store).delete_all(id).await?;
        tracing::info!(character_id = %id, "Character records deleted");
        Ok(())
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn magic(&self) -> &MagicState {
        &self.magic
    }

    pub fn class_resources(&self) -> &ClassResourcesState {
        &self.resources
    }

    pub fn equipped_items(&self) -> &[EquippedItem] {
        &self.equipped
    }

    /// Whether there are changes not yet flushed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Message of the last failed flush, cleared by a successful one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write all three records if anything changed.
    ///
    /// Failed writes are retried with backoff. If every attempt fails the
    /// in-memory state is kept as is, the engine stays dirty and the error
    /// is recorded in [`last_error`](Self::last_error).
    pub async fn flush(&mut self) -> Result<(), EngineError> {
        if !self.dirty {
            return Ok(());
        }

        let this = &*self;
        let result = retry_with_backoff(&this.ports.retry, "flush", move || this.write_records()).await;

        match result {
            Ok(()) => {
                self.dirty = false;
                self.last_error = None;
                tracing::debug!(character_id = %self.character.id, "Character flushed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    character_id = %self.character.id,
                    error = %e,
                    "Flush failed, keeping changes in memory"
                );
                self.last_error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    async fn write_records(&self) -> Result<(), StoreError> {
        let id = self.character.id;
        self.records.save_character(&self.character).await?;
        self.records.save_magic(id, &self.magic).await?;
        self.records.save_class_resources(id, &self.resources).await
    }

    /// Re-read the equipped items. On failure the previous snapshot stays.
    pub async fn refresh_equipment(&mut self) -> Result<(), EngineError> {
        self.equipped = self.ports.equipment.equipped_items(self.character.id).await?;
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Roll one die with the engine's random source.
    pub fn roll(&self, sides: u8) -> u8 {
        roll_die(self.ports.random.as_ref(), sides)
    }

    fn now(&self) -> DateTime<Utc> {
        self.ports.clock.now()
    }

    /// Record a change made at `now`.
    fn touch(&mut self, now: DateTime<Utc>) {
        self.character.updated_at = now;
        self.dirty = true;
    }
}
