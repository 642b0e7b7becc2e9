use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{HpMethod, SpellSwap};
use crate::error::DomainError;
use crate::rules::FeatureChoiceSelection;
use crate::value_objects::{Ability, HitDie};

/// Everything decided during a level-up, committed in one step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpOptions {
    pub hp_method: HpMethod,
    /// The single authoritative roll when `hp_method` is `Roll`.
    #[serde(default)]
    pub hp_rolled: Option<u8>,
    /// Points added per ability. Only abilities that got points appear.
    #[serde(default)]
    pub ability_improvements: BTreeMap<Ability, i32>,
    #[serde(default)]
    pub subclass_chosen: Option<String>,
    #[serde(default)]
    pub subclass_feature_choices: Vec<FeatureChoiceSelection>,
    #[serde(default)]
    pub cantrips_learned: Vec<String>,
    #[serde(default)]
    pub spells_learned: Vec<String>,
    #[serde(default)]
    pub spellbook_added: Vec<String>,
    #[serde(default)]
    pub spell_swapped: Option<SpellSwap>,
    #[serde(default)]
    pub metamagic_chosen: Vec<String>,
}

impl LevelUpOptions {
    pub fn fixed() -> Self {
        Self::default()
    }

    pub fn rolled(roll: u8) -> Self {
        Self {
            hp_method: HpMethod::Roll,
            hp_rolled: Some(roll),
            ..Self::default()
        }
    }

    /// All spell ids learned this level, in record order.
    pub fn all_spells_learned(&self) -> Vec<String> {
        self.cantrips_learned
            .iter()
            .chain(&self.spells_learned)
            .chain(&self.spellbook_added)
            .cloned()
            .collect()
    }
}

/// Die value before CON: the fixed value or the roll.
pub fn hp_base_value(die: HitDie, method: HpMethod, rolled: Option<u8>) -> Result<i32, DomainError> {
    match (method, rolled) {
        (HpMethod::Fixed, _) => Ok(die.fixed_value()),
        (HpMethod::Roll, Some(roll)) if die.is_valid_roll(i32::from(roll)) => Ok(i32::from(roll)),
        (HpMethod::Roll, Some(roll)) => Err(DomainError::validation(format!(
            "Roll {} is not a face of a {}",
            roll, die
        ))),
        (HpMethod::Roll, None) => Err(DomainError::validation("HP roll has not been made")),
    }
}

/// HP gained on a level: `max(1, base + CON)`.
pub fn hp_gain(die: HitDie, method: HpMethod, rolled: Option<u8>, con_modifier: i32) -> Result<i32, DomainError> {
    Ok((hp_base_value(die, method, rolled)? + con_modifier).max(1))
}
