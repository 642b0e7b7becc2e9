//! Spell resources: slot pools, pact magic, sorcery points and spell lists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::character::Character;
use crate::rules::{pact_magic_slots, spell_slots, CharacterClass};

/// One ordinary spell-slot level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPool {
    pub total: u8,
    pub used: u8,
}

impl SlotPool {
    pub fn available(&self) -> u8 {
        self.total.saturating_sub(self.used)
    }
}

/// The warlock's pact pool: every slot is cast at `slot_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PactPool {
    pub slot_level: u8,
    pub total: u8,
    pub used: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SorceryPoints {
    pub max: u32,
    pub current: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicState {
    #[serde(default)]
    pub known_spell_ids: Vec<String>,
    #[serde(default)]
    pub prepared_spell_ids: Vec<String>,
    #[serde(default)]
    pub spellbook_ids: Vec<String>,
    /// Slot level to pool. Levels with no slots are absent.
    #[serde(default)]
    pub spell_slots: BTreeMap<u8, SlotPool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pact_magic_slots: Option<PactPool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorcery_points: Option<SorceryPoints>,
    /// Sorcerers only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metamagic_chosen: Option<Vec<String>>,
    /// Spells pinned to the top of the sheet.
    #[serde(default)]
    pub favorite_spell_ids: Vec<String>,
}

impl MagicState {
    /// Fresh resources for the character's class and level, all unspent.
    ///
    /// Spell lists are copied from the character.
    pub fn default_for(character: &Character) -> Self {
        let mut state = Self::pools_for(character.class, character.level);
        state.known_spell_ids = character.known_spell_ids.clone();
        state.prepared_spell_ids = character.prepared_spell_ids.clone();
        state.spellbook_ids = character.spellbook_ids.clone();
        state
    }

    fn pools_for(class: CharacterClass, level: u8) -> Self {
        let spell_slots = spell_slots(class, level)
            .into_iter()
            .map(|(slot_level, total)| (slot_level, SlotPool { total, used: 0 }))
            .collect();

        let pact_magic_slots = if class == CharacterClass::Warlock {
            pact_magic_slots(level).map(|p| PactPool {
                slot_level: p.slot_level,
                total: p.total,
                used: 0,
            })
        } else {
            None
        };

        let is_sorcerer = class == CharacterClass::Sorcerer;
        let sorcery_points = is_sorcerer.then(|| SorceryPoints {
            max: u32::from(level),
            current: u32::from(level),
        });

        Self {
            spell_slots,
            pact_magic_slots,
            sorcery_points,
            metamagic_chosen: is_sorcerer.then(Vec::new),
            ..Self::default()
        }
    }

    /// Resize the pools for a new level.
    ///
    /// Spent slots stay spent where the pool still exists (capped at the new
    /// total). Sorcery points gain whatever the maximum gained.
    pub fn rebuild_for_level(&mut self, class: CharacterClass, level: u8) {
        let fresh = Self::pools_for(class, level);

        let spell_slots = fresh
            .spell_slots
            .into_iter()
            .map(|(slot_level, pool)| {
                let used = self
                    .spell_slots
                    .get(&slot_level)
                    .map(|old| old.used.min(pool.total))
                    .unwrap_or(0);
                (slot_level, SlotPool { used, ..pool })
            })
            .collect();

        let pact_magic_slots = fresh.pact_magic_slots.map(|pool| PactPool {
            used: self
                .pact_magic_slots
                .map(|old| old.used.min(pool.total))
                .unwrap_or(0),
            ..pool
        });

        let sorcery_points = fresh.sorcery_points.map(|fresh_points| match self.sorcery_points {
            Some(old) => {
                let gained = fresh_points.max.saturating_sub(old.max);
                SorceryPoints {
                    max: fresh_points.max,
                    current: (old.current + gained).min(fresh_points.max),
                }
            }
            None => fresh_points,
        });

        let metamagic_chosen = fresh
            .metamagic_chosen
            .map(|_| self.metamagic_chosen.take().unwrap_or_default());

        self.spell_slots = spell_slots;
        self.pact_magic_slots = pact_magic_slots;
        self.sorcery_points = sorcery_points;
        self.metamagic_chosen = metamagic_chosen;
    }

    /// Spend a slot of `level`. Returns false, changing nothing, if there is
    /// no pool at that level or it is exhausted.
    pub fn use_spell_slot(&mut self, level: u8) -> bool {
        match self.spell_slots.get_mut(&level) {
            Some(pool) if pool.used < pool.total => {
                pool.used += 1;
                true
            }
            _ => false,
        }
    }

    pub fn restore_spell_slot(&mut self, level: u8) {
        if let Some(pool) = self.spell_slots.get_mut(&level) {
            pool.used = pool.used.saturating_sub(1);
        }
    }

    pub fn restore_all_spell_slots(&mut self) {
        for pool in self.spell_slots.values_mut() {
            pool.used = 0;
        }
    }

    pub fn use_pact_slot(&mut self) -> bool {
        match self.pact_magic_slots.as_mut() {
            Some(pool) if pool.used < pool.total => {
                pool.used += 1;
                true
            }
            _ => false,
        }
    }

    pub fn restore_all_pact_slots(&mut self) {
        if let Some(pool) = self.pact_magic_slots.as_mut() {
            pool.used = 0;
        }
    }

    /// Spend `amount` sorcery points; fails without a pool, for a zero
    /// amount, or when fewer points remain.
    pub fn spend_sorcery_points(&mut self, amount: u32) -> bool {
        match self.sorcery_points.as_mut() {
            Some(points) if amount > 0 && points.current >= amount => {
                points.current -= amount;
                true
            }
            _ => false,
        }
    }

    pub fn restore_sorcery_points(&mut self) {
        if let Some(points) = self.sorcery_points.as_mut() {
            points.current = points.max;
        }
    }

    /// Flip a spell's prepared state and return the new state.
    pub fn toggle_prepared(&mut self, spell_id: &str) -> bool {
        if let Some(pos) = self.prepared_spell_ids.iter().position(|id| id == spell_id) {
            self.prepared_spell_ids.remove(pos);
            false
        } else {
            self.prepared_spell_ids.push(spell_id.to_string());
            true
        }
    }

    /// Flip a spell's favorite flag and return the new state.
    pub fn toggle_favorite(&mut self, spell_id: &str) -> bool {
        if let Some(pos) = self.favorite_spell_ids.iter().position(|id| id == spell_id) {
            self.favorite_spell_ids.remove(pos);
            false
        } else {
            self.favorite_spell_ids.push(spell_id.to_string());
            true
        }
    }

    /// Copy the spell lists onto the character record.
    pub fn sync_spell_ids(&self, character: &mut Character) {
        character.known_spell_ids = self.known_spell_ids.clone();
        character.prepared_spell_ids = self.prepared_spell_ids.clone();
        character.spellbook_ids = self.spellbook_ids.clone();
    }
}

/// Append ids that are not already present, keeping order.
pub(crate) fn merge_unique<'a>(target: &mut Vec<String>, ids: impl IntoIterator<Item = &'a String>) {
    for id in ids {
        if !target.contains(id) {
            target.push(id.clone());
        }
    }
}
