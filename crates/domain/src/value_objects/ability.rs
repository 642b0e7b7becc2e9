//! Ability scores
//!
//! Each of the six abilities keeps its contributing parts so a level-up
//! or a reset can change one part and recompute the rest.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Highest total any ability score may reach through improvements.
pub const MAX_ABILITY_SCORE: i32 = 20;

/// The six abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Str,
    Dex,
    Con,
    Int,
    Wis,
    Cha,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Str,
        Ability::Dex,
        Ability::Con,
        Ability::Int,
        Ability::Wis,
        Ability::Cha,
    ];

    pub fn abbreviation(self) -> &'static str {
        match self {
            Ability::Str => "STR",
            Ability::Dex => "DEX",
            Ability::Con => "CON",
            Ability::Int => "INT",
            Ability::Wis => "WIS",
            Ability::Cha => "CHA",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "strength" => Ok(Ability::Str),
            "dex" | "dexterity" => Ok(Ability::Dex),
            "con" | "constitution" => Ok(Ability::Con),
            "int" | "intelligence" => Ok(Ability::Int),
            "wis" | "wisdom" => Ok(Ability::Wis),
            "cha" | "charisma" => Ok(Ability::Cha),
            _ => Err(DomainError::parse(format!("Unknown ability: {}", s))),
        }
    }
}

/// Ability modifier for a score.
///
/// Uses floor division: Rust's `/` rounds toward zero, which would give
/// the wrong modifier for odd scores below 10.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// One ability score with all of its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityScore {
    pub base: i32,
    pub racial: i32,
    pub improvement: i32,
    pub misc: i32,
    /// When set, replaces the computed total entirely.
    pub override_value: Option<i32>,
    pub total: i32,
    pub modifier: i32,
}

impl AbilityScore {
    pub fn new(base: i32) -> Self {
        Self::with_parts(base, 0, 0, 0, None)
    }

    pub fn with_parts(
        base: i32,
        racial: i32,
        improvement: i32,
        misc: i32,
        override_value: Option<i32>,
    ) -> Self {
        let mut score = Self {
            base,
            racial,
            improvement,
            misc,
            override_value,
            total: 0,
            modifier: 0,
        };
        score.recompute();
        score
    }

    /// Recompute `total` and `modifier` from the parts.
    ///
    /// The computed sum is capped at [`MAX_ABILITY_SCORE`]; an override is
    /// taken as-is.
    pub fn recompute(&mut self) {
        self.total = match self.override_value {
            Some(value) => value,
            None => (self.base + self.racial + self.improvement + self.misc).min(MAX_ABILITY_SCORE),
        };
        self.modifier = ability_modifier(self.total);
    }
}

impl Default for AbilityScore {
    fn default() -> Self {
        Self::new(10)
    }
}

/// All six ability scores.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityScores {
    #[serde(rename = "str")]
    pub strength: AbilityScore,
    #[serde(rename = "dex")]
    pub dexterity: AbilityScore,
    #[serde(rename = "con")]
    pub constitution: AbilityScore,
    #[serde(rename = "int")]
    pub intelligence: AbilityScore,
    #[serde(rename = "wis")]
    pub wisdom: AbilityScore,
    #[serde(rename = "cha")]
    pub charisma: AbilityScore,
}

impl AbilityScores {
    /// Scores from base values in STR, DEX, CON, INT, WIS, CHA order.
    pub fn from_bases(bases: [i32; 6]) -> Self {
        let [str_, dex, con, int, wis, cha] = bases;
        Self {
            strength: AbilityScore::new(str_),
            dexterity: AbilityScore::new(dex),
            constitution: AbilityScore::new(con),
            intelligence: AbilityScore::new(int),
            wisdom: AbilityScore::new(wis),
            charisma: AbilityScore::new(cha),
        }
    }

    pub fn get(&self, ability: Ability) -> &AbilityScore {
        match ability {
            Ability::Str => &self.strength,
            Ability::Dex => &self.dexterity,
            Ability::Con => &self.constitution,
            Ability::Int => &self.intelligence,
            Ability::Wis => &self.wisdom,
            Ability::Cha => &self.charisma,
        }
    }

    pub fn get_mut(&mut self, ability: Ability) -> &mut AbilityScore {
        match ability {
            Ability::Str => &mut self.strength,
            Ability::Dex => &mut self.dexterity,
            Ability::Con => &mut self.constitution,
            Ability::Int => &mut self.intelligence,
            Ability::Wis => &mut self.wisdom,
            Ability::Cha => &mut self.charisma,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        self.get(ability).modifier
    }

    pub fn total(&self, ability: Ability) -> i32 {
        self.get(ability).total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_modifier_calculation() {
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(12), 1);
        assert_eq!(ability_modifier(15), 2);
        assert_eq!(ability_modifier(20), 5);
    }

    #[test]
    fn total_sums_parts_and_caps() {
        let score = AbilityScore::with_parts(15, 2, 2, 0, None);
        assert_eq!(score.total, 19);
        assert_eq!(score.modifier, 4);

        let capped = AbilityScore::with_parts(17, 2, 2, 1, None);
        assert_eq!(capped.total, MAX_ABILITY_SCORE);
    }

    #[test]
    fn override_wins_over_parts() {
        let score = AbilityScore::with_parts(8, 0, 2, 0, Some(19));
        assert_eq!(score.total, 19);
        assert_eq!(score.modifier, 4);
    }

    #[test]
    fn parse_ability_names() {
        assert_eq!("dex".parse::<Ability>(), Ok(Ability::Dex));
        assert_eq!("Wisdom".parse::<Ability>(), Ok(Ability::Wis));
        assert!("luck".parse::<Ability>().is_err());
    }

    #[test]
    fn scores_serialize_with_short_keys() {
        let scores = AbilityScores::from_bases([15, 14, 13, 12, 10, 8]);
        let json = serde_json::to_value(&scores).unwrap();
        assert_eq!(json["con"]["total"], 13);
        assert_eq!(json["str"]["modifier"], 2);
        assert!(json["cha"]["overrideValue"].is_null());
    }
}
