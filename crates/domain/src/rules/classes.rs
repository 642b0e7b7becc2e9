//! Class data: hit die, subclass timing, spellcasting profile and saves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{Ability, HitDie};

/// The twelve base classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

impl CharacterClass {
    pub const ALL: [CharacterClass; 12] = [
        CharacterClass::Barbarian,
        CharacterClass::Bard,
        CharacterClass::Cleric,
        CharacterClass::Druid,
        CharacterClass::Fighter,
        CharacterClass::Monk,
        CharacterClass::Paladin,
        CharacterClass::Ranger,
        CharacterClass::Rogue,
        CharacterClass::Sorcerer,
        CharacterClass::Warlock,
        CharacterClass::Wizard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "barbarian",
            CharacterClass::Bard => "bard",
            CharacterClass::Cleric => "cleric",
            CharacterClass::Druid => "druid",
            CharacterClass::Fighter => "fighter",
            CharacterClass::Monk => "monk",
            CharacterClass::Paladin => "paladin",
            CharacterClass::Ranger => "ranger",
            CharacterClass::Rogue => "rogue",
            CharacterClass::Sorcerer => "sorcerer",
            CharacterClass::Warlock => "warlock",
            CharacterClass::Wizard => "wizard",
        }
    }

    /// Static rules data for this class.
    pub fn data(self) -> ClassData {
        use CharacterClass::*;
        use SpellPreparation as Prep;

        let (hit_die, subclass_level, caster_type, spell_ability, preparation, saves) = match self {
            Barbarian => (HitDie::D12, 3, CasterType::None, None, Prep::None, [Ability::Str, Ability::Con]),
            Bard => (HitDie::D8, 3, CasterType::Full, Some(Ability::Cha), Prep::Known, [Ability::Dex, Ability::Cha]),
            Cleric => (HitDie::D8, 1, CasterType::Full, Some(Ability::Wis), Prep::Prepared, [Ability::Wis, Ability::Cha]),
            Druid => (HitDie::D8, 2, CasterType::Full, Some(Ability::Wis), Prep::Prepared, [Ability::Int, Ability::Wis]),
            Fighter => (HitDie::D10, 3, CasterType::None, None, Prep::None, [Ability::Str, Ability::Con]),
            Monk => (HitDie::D8, 3, CasterType::None, None, Prep::None, [Ability::Str, Ability::Dex]),
            Paladin => (HitDie::D10, 3, CasterType::Half, Some(Ability::Cha), Prep::Prepared, [Ability::Wis, Ability::Cha]),
            Ranger => (HitDie::D10, 3, CasterType::Half, Some(Ability::Wis), Prep::Known, [Ability::Str, Ability::Dex]),
            Rogue => (HitDie::D8, 3, CasterType::None, None, Prep::None, [Ability::Dex, Ability::Int]),
            Sorcerer => (HitDie::D6, 1, CasterType::Full, Some(Ability::Cha), Prep::Known, [Ability::Con, Ability::Cha]),
            Warlock => (HitDie::D8, 1, CasterType::Pact, Some(Ability::Cha), Prep::Known, [Ability::Wis, Ability::Cha]),
            Wizard => (HitDie::D6, 2, CasterType::Full, Some(Ability::Int), Prep::Spellbook, [Ability::Int, Ability::Wis]),
        };

        ClassData {
            class: self,
            hit_die,
            subclass_level,
            caster_type,
            spell_ability,
            preparation,
            saving_throws: saves,
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CharacterClass::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| DomainError::parse(format!("Unknown class: {}", s)))
    }
}

/// Type of spellcaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasterType {
    /// Full caster (Wizard, Cleric, Druid, Sorcerer, Bard)
    Full,
    /// Half caster (Paladin, Ranger)
    Half,
    /// Third caster (subclass casters such as Eldritch Knight)
    Third,
    /// Pact magic (Warlock)
    Pact,
    /// No spellcasting
    None,
}

/// How a class decides which spells it can cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellPreparation {
    /// Fixed list of known spells, swappable on level-up.
    Known,
    /// Prepares daily from the whole class list.
    Prepared,
    /// Prepares daily from a personal spellbook.
    Spellbook,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassData {
    pub class: CharacterClass,
    pub hit_die: HitDie,
    /// Level at which the subclass is chosen.
    pub subclass_level: u8,
    pub caster_type: CasterType,
    pub spell_ability: Option<Ability>,
    pub preparation: SpellPreparation,
    pub saving_throws: [Ability; 2],
}

impl ClassData {
    pub fn is_caster(&self) -> bool {
        self.caster_type != CasterType::None
    }

    /// Hit points at level 1: the die's maximum plus CON, never below 1.
    pub fn level_one_hp(&self, con_modifier: i32) -> i32 {
        (i32::from(self.hit_die.sides()) + con_modifier).max(1)
    }
}
