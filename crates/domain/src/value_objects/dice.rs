//! Hit die value object and parsing
//!
//! Hit dice are stored as their tabletop notation ("d8") and parsed on
//! the way in so the rest of the domain only ever sees a known die.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error when parsing a hit die string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The input string is empty
    #[error("Empty hit die")]
    Empty,
    /// Invalid format - expected dY
    #[error("Invalid hit die format: {0}")]
    InvalidFormat(String),
    /// Die size is not one a class can use
    #[error("Unsupported hit die size: d{0}")]
    UnsupportedSize(u8),
}

/// The class hit die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitDie {
    #[serde(rename = "d6")]
    D6,
    #[serde(rename = "d8")]
    D8,
    #[serde(rename = "d10")]
    D10,
    #[serde(rename = "d12")]
    D12,
}

impl HitDie {
    /// Number of faces on the die.
    pub fn sides(self) -> u8 {
        match self {
            HitDie::D6 => 6,
            HitDie::D8 => 8,
            HitDie::D10 => 10,
            HitDie::D12 => 12,
        }
    }

    /// Fixed hit-point value taken instead of rolling: half the die plus one
    /// (the average rounded up).
    pub fn fixed_value(self) -> i32 {
        i32::from(self.sides()) / 2 + 1
    }

    /// Whether `roll` is a face this die can show.
    pub fn is_valid_roll(self, roll: i32) -> bool {
        (1..=i32::from(self.sides())).contains(&roll)
    }

    /// Build a die from its face count.
    pub fn from_sides(sides: u8) -> Result<Self, DiceParseError> {
        match sides {
            6 => Ok(HitDie::D6),
            8 => Ok(HitDie::D8),
            10 => Ok(HitDie::D10),
            12 => Ok(HitDie::D12),
            other => Err(DiceParseError::UnsupportedSize(other)),
        }
    }
}

impl fmt::Display for HitDie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

impl FromStr for HitDie {
    type Err = DiceParseError;

    /// Parse "d8", "1d8" or "D8".
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let d_pos = input.find('d').ok_or_else(|| {
            DiceParseError::InvalidFormat(format!("Missing 'd' separator in '{}'", input))
        })?;

        let count = &input[..d_pos];
        if !count.is_empty() && count != "1" {
            return Err(DiceParseError::InvalidFormat(format!(
                "A hit die is a single die, got '{}'",
                input
            )));
        }

        let sides_str = &input[d_pos + 1..];
        let sides: u8 = sides_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", sides_str))
        })?;

        Self::from_sides(sides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_value_rounds_average_up() {
        assert_eq!(HitDie::D6.fixed_value(), 4);
        assert_eq!(HitDie::D8.fixed_value(), 5);
        assert_eq!(HitDie::D10.fixed_value(), 6);
        assert_eq!(HitDie::D12.fixed_value(), 7);
    }

    #[test]
    fn parse_accepts_common_notations() {
        assert_eq!("d8".parse::<HitDie>(), Ok(HitDie::D8));
        assert_eq!("1d12".parse::<HitDie>(), Ok(HitDie::D12));
        assert_eq!(" D6 ".parse::<HitDie>(), Ok(HitDie::D6));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!("".parse::<HitDie>(), Err(DiceParseError::Empty));
        assert_eq!("d20".parse::<HitDie>(), Err(DiceParseError::UnsupportedSize(20)));
        assert!(matches!(
            "2d8".parse::<HitDie>(),
            Err(DiceParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            "eight".parse::<HitDie>(),
            Err(DiceParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn roll_bounds() {
        assert!(HitDie::D8.is_valid_roll(1));
        assert!(HitDie::D8.is_valid_roll(8));
        assert!(!HitDie::D8.is_valid_roll(0));
        assert!(!HitDie::D8.is_valid_roll(9));
    }

    #[test]
    fn serializes_as_notation() {
        let json = serde_json::to_string(&HitDie::D10).unwrap();
        assert_eq!(json, "\"d10\"");
        assert_eq!(HitDie::D10.to_string(), "d10");
    }
}
