//! Persisted records: the character, its magic and its class resources.

mod character;
mod class_resources;
mod equipment;
mod magic;

pub use character::{
    class_trait_id, Character, CharacterTrait, CombatLogEntry, CombatLogKind, Concentration,
    DeathSaves, HitDicePool, HitPoints, HpMethod, LevelUpRecord, RechargeType, SpellSwap,
    TraitOrigin, COMBAT_LOG_MAX, DEATH_SAVE_LIMIT,
};
pub use class_resources::ClassResourcesState;
pub use equipment::{armor_class, ArmorDetails, EquipmentCategory, EquippedItem, UNARMORED_BASE_AC};
pub use magic::{MagicState, PactPool, SlotPool, SorceryPoints};

pub(crate) use magic::merge_unique;

#[cfg(test)]
pub(crate) use character::test_support;
