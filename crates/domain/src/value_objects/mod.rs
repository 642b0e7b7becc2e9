//! Value objects - Immutable objects defined by their attributes

mod ability;
mod condition;
mod dice;
mod proficiency;

pub use ability::{ability_modifier, Ability, AbilityScore, AbilityScores, MAX_ABILITY_SCORE};
pub use condition::{ActiveCondition, Condition};
pub use dice::{DiceParseError, HitDie};
pub use proficiency::{ProficiencyLevel, Skill};
