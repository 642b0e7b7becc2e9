//! Character progression and resource rules.
//!
//! Pure state and rules: no I/O, no clock, no randomness. Callers pass the
//! current time and die rolls into every command that needs them.

pub mod entities;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod level_up;
pub mod progression;
pub mod rest;
pub mod rules;
pub mod value_objects;

pub use entities::{
    armor_class, class_trait_id, ArmorDetails, Character, CharacterTrait, ClassResourcesState,
    CombatLogEntry, CombatLogKind, Concentration, DeathSaves, EquipmentCategory, EquippedItem,
    HitDicePool, HitPoints, HpMethod, LevelUpRecord, MagicState, PactPool, RechargeType, SlotPool,
    SorceryPoints, SpellSwap, TraitOrigin, COMBAT_LOG_MAX, DEATH_SAVE_LIMIT, UNARMORED_BASE_AC,
};
pub use error::DomainError;
pub use ids::{CharacterId, CombatLogEntryId};
pub use ledger::{hit_die_healing, DeathSaveFailure, DeathSaveSuccess, HitDieRoll};
pub use level_up::{
    apply_level_up, reset_to_level_one, LevelUpOptions, LevelUpOutcome, LevelUpPlan, LevelUpStep,
    LevelUpWizard, WizardBack, WizardTransition,
};
pub use rest::{long_rest, short_rest, LongRestResult, ShortRestResult};
pub use rules::{CharacterClass, LevelUpSummary, MAX_LEVEL, MAX_XP};
pub use value_objects::{Ability, AbilityScore, AbilityScores, Condition, HitDie, Skill};
