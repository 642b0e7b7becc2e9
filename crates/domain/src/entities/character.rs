//! Character record: identity, ability scores and in-play state.
//!
//! Plain data with public fields. Commands that keep the invariants live in
//! [`crate::ledger`], [`crate::rest`], [`crate::progression`] and
//! [`crate::level_up`]; this module only builds characters and answers
//! derived questions about them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, CombatLogEntryId};
use crate::rules::{features_for_level, proficiency_bonus, CharacterClass, ClassData, FeatureChoiceSelection};
use crate::value_objects::{Ability, AbilityScores, ActiveCondition, HitDie, ProficiencyLevel, Skill};

/// Entries kept in the combat log.
pub const COMBAT_LOG_MAX: usize = 100;

/// Successes (or failures) that end a run of death saves.
pub const DEATH_SAVE_LIMIT: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPoints {
    pub max: i32,
    pub current: i32,
    pub temp: i32,
}

impl HitPoints {
    pub fn full(max: i32) -> Self {
        Self {
            max,
            current: max,
            temp: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitDicePool {
    pub die: HitDie,
    pub total: u8,
    pub remaining: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeathSaves {
    pub successes: u8,
    pub failures: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concentration {
    pub spell_id: String,
    pub spell_name: String,
    pub started_at: DateTime<Utc>,
}

/// When a trait's charges come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RechargeType {
    #[default]
    None,
    ShortRest,
    LongRest,
    Dawn,
}

/// Where a trait came from. Reset to level 1 keeps everything that is not
/// class or subclass progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitOrigin {
    Race,
    Background,
    Class,
    Subclass,
    Feat,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterTrait {
    pub id: String,
    pub name: String,
    pub description: String,
    pub origin: TraitOrigin,
    /// `None` means the trait can be used without limit.
    pub max_uses: Option<u32>,
    pub current_uses: Option<u32>,
    pub recharge: RechargeType,
}

impl CharacterTrait {
    /// A trait without charges.
    pub fn passive(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        origin: TraitOrigin,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            origin,
            max_uses: None,
            current_uses: None,
            recharge: RechargeType::None,
        }
    }

    /// A trait with `uses` charges, starting full.
    pub fn limited(mut self, uses: u32, recharge: RechargeType) -> Self {
        self.max_uses = Some(uses);
        self.current_uses = Some(uses);
        self.recharge = recharge;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatLogKind {
    Damage,
    Healing,
    TempHp,
    HitDice,
    DeathSave,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatLogEntry {
    pub id: CombatLogEntryId,
    pub timestamp: DateTime<Utc>,
    pub kind: CombatLogKind,
    pub amount: i32,
    pub hp_after: i32,
    pub description: String,
}

/// How the HP gained on a level was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HpMethod {
    #[default]
    Fixed,
    Roll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSwap {
    pub forgotten: String,
    pub learned: String,
}

/// One entry of level history, written when a level is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpRecord {
    pub level: u8,
    pub date: DateTime<Utc>,
    pub hp_gained: i32,
    pub hp_method: HpMethod,
    #[serde(default)]
    pub ability_improvements: BTreeMap<Ability, i32>,
    #[serde(default)]
    pub subclass_chosen: Option<String>,
    #[serde(default)]
    pub subclass_feature_choices: Vec<FeatureChoiceSelection>,
    #[serde(default)]
    pub spells_learned: Vec<String>,
    #[serde(default)]
    pub spells_swapped: Vec<SpellSwap>,
    #[serde(default)]
    pub traits_gained: Vec<String>,
}

impl LevelUpRecord {
    /// The record written for a freshly created level-1 character.
    pub fn level_one(hp: i32, traits_gained: Vec<String>, date: DateTime<Utc>) -> Self {
        Self {
            level: 1,
            date,
            hp_gained: hp,
            hp_method: HpMethod::Fixed,
            ability_improvements: BTreeMap::new(),
            subclass_chosen: None,
            subclass_feature_choices: Vec::new(),
            spells_learned: Vec::new(),
            spells_swapped: Vec::new(),
            traits_gained,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub class: CharacterClass,
    pub subclass: Option<String>,
    pub level: u8,
    pub experience: u32,
    pub abilities: AbilityScores,
    /// Mirrors the level; rewritten whenever the level changes.
    pub proficiency_bonus: i32,
    #[serde(default)]
    pub saving_throws: BTreeMap<Ability, bool>,
    #[serde(default)]
    pub skill_proficiencies: BTreeMap<Skill, ProficiencyLevel>,
    pub hp: HitPoints,
    pub hit_dice: HitDicePool,
    #[serde(default)]
    pub death_saves: DeathSaves,
    #[serde(default)]
    pub conditions: Vec<ActiveCondition>,
    #[serde(default)]
    pub concentration: Option<Concentration>,
    #[serde(default)]
    pub traits: Vec<CharacterTrait>,
    /// Newest first.
    #[serde(default)]
    pub combat_log: Vec<CombatLogEntry>,
    #[serde(default)]
    pub level_history: Vec<LevelUpRecord>,
    #[serde(default)]
    pub known_spell_ids: Vec<String>,
    #[serde(default)]
    pub prepared_spell_ids: Vec<String>,
    #[serde(default)]
    pub spellbook_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Character {
    /// Build a level-1 character from class tables and ability scores.
    ///
    /// HP is the hit die maximum plus CON, saving throws come from the
    /// class, and the class's level-1 features become traits.
    pub fn new_level_one(
        name: impl Into<String>,
        class: CharacterClass,
        abilities: AbilityScores,
        now: DateTime<Utc>,
    ) -> Self {
        let data = class.data();
        let max_hp = data.level_one_hp(abilities.modifier(Ability::Con));

        let class_features: Vec<_> = features_for_level(class, 1)
            .into_iter()
            .filter(|f| !f.is_subclass)
            .collect();
        let traits = class_features
            .iter()
            .map(|f| {
                CharacterTrait::passive(
                    class_trait_id(class, &f.name, 1),
                    f.name.clone(),
                    f.description.clone(),
                    TraitOrigin::Class,
                )
            })
            .collect();
        let traits_gained = class_features.into_iter().map(|f| f.name).collect();

        let saving_throws = Ability::ALL
            .into_iter()
            .map(|a| (a, data.saving_throws.contains(&a)))
            .collect();

        Self {
            id: CharacterId::new(),
            name: name.into(),
            class,
            subclass: None,
            level: 1,
            experience: 0,
            abilities,
            proficiency_bonus: proficiency_bonus(1),
            saving_throws,
            skill_proficiencies: BTreeMap::new(),
            hp: HitPoints::full(max_hp),
            hit_dice: HitDicePool {
                die: data.hit_die,
                total: 1,
                remaining: 1,
            },
            death_saves: DeathSaves::default(),
            conditions: Vec::new(),
            concentration: None,
            traits,
            combat_log: Vec::new(),
            level_history: vec![LevelUpRecord::level_one(max_hp, traits_gained, now)],
            known_spell_ids: Vec::new(),
            prepared_spell_ids: Vec::new(),
            spellbook_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Spells picked at creation. They are known and prepared (and copied
    /// into a wizard's spellbook), and recorded on the level-1 entry so a
    /// reset can restore them.
    pub fn with_starting_spells(mut self, spell_ids: Vec<String>) -> Self {
        if self.class == CharacterClass::Wizard {
            self.spellbook_ids = spell_ids.clone();
        }
        self.known_spell_ids = spell_ids.clone();
        self.prepared_spell_ids = spell_ids.clone();
        if let Some(record) = self.level_history.iter_mut().find(|r| r.level == 1) {
            record.spells_learned = spell_ids;
        }
        self
    }

    /// The level-1 history entry, if one was recorded.
    pub fn level_one_record(&self) -> Option<&LevelUpRecord> {
        self.level_history.iter().find(|r| r.level == 1)
    }

    pub fn class_data(&self) -> ClassData {
        self.class.data()
    }

    pub fn proficiency_bonus(&self) -> i32 {
        proficiency_bonus(self.level)
    }

    pub fn ability_modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }

    pub fn skill_proficiency(&self, skill: Skill) -> ProficiencyLevel {
        self.skill_proficiencies.get(&skill).copied().unwrap_or_default()
    }

    /// Ability modifier plus proficiency scaled by the skill's level.
    pub fn skill_bonus(&self, skill: Skill) -> i32 {
        self.ability_modifier(skill.ability())
            + self.proficiency_bonus() * self.skill_proficiency(skill).multiplier()
    }

    pub fn is_proficient_in_save(&self, ability: Ability) -> bool {
        self.saving_throws.get(&ability).copied().unwrap_or(false)
    }

    pub fn saving_throw_bonus(&self, ability: Ability) -> i32 {
        let proficiency = if self.is_proficient_in_save(ability) {
            self.proficiency_bonus()
        } else {
            0
        };
        self.ability_modifier(ability) + proficiency
    }

    pub fn trait_by_id(&self, id: &str) -> Option<&CharacterTrait> {
        self.traits.iter().find(|t| t.id == id)
    }

    pub fn has_condition(&self, condition: crate::value_objects::Condition) -> bool {
        self.conditions.iter().any(|c| c.condition == condition)
    }

    /// Prepend a combat log entry, dropping the oldest past the cap.
    pub(crate) fn push_log(
        &mut self,
        kind: CombatLogKind,
        amount: i32,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        let entry = CombatLogEntry {
            id: CombatLogEntryId::new(),
            timestamp: now,
            kind,
            amount,
            hp_after: self.hp.current,
            description: description.into(),
        };
        self.combat_log.insert(0, entry);
        self.combat_log.truncate(COMBAT_LOG_MAX);
    }
}

/// Trait id for a class or subclass feature: `{class}_{name}_lv{level}`.
pub fn class_trait_id(class: CharacterClass, feature_name: &str, level: u8) -> String {
    let mut slug = String::with_capacity(feature_name.len());
    for c in feature_name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    let slug = slug.trim_end_matches('_');
    format!("{}_{}_lv{}", class.as_str(), slug, level)
}
