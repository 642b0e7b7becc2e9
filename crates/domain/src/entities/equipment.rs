//! Equipped items as seen by the armor-class calculation.
//!
//! Inventory lives elsewhere; the engine receives a snapshot of what is
//! currently equipped and only reads armor data from it.

use serde::{Deserialize, Serialize};

use crate::value_objects::Ability;

use super::character::Character;

/// Base armor class with no armor worn.
pub const UNARMORED_BASE_AC: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentCategory {
    Armor,
    Shield,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorDetails {
    pub base_ac: i32,
    pub add_dex_modifier: bool,
    #[serde(default)]
    pub max_dex_bonus: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquippedItem {
    pub id: String,
    pub name: String,
    pub category: EquipmentCategory,
    #[serde(default)]
    pub armor: Option<ArmorDetails>,
}

/// Armor class from DEX and the first equipped body armor and shield.
pub fn armor_class(dex_modifier: i32, equipped: &[EquippedItem]) -> i32 {
    let armor_of = |category: EquipmentCategory| {
        equipped
            .iter()
            .filter(|item| item.category == category)
            .find_map(|item| item.armor)
    };

    let body = match armor_of(EquipmentCategory::Armor) {
        None => UNARMORED_BASE_AC + dex_modifier,
        Some(armor) if !armor.add_dex_modifier => armor.base_ac,
        Some(ArmorDetails {
            base_ac,
            max_dex_bonus: Some(cap),
            ..
        }) => base_ac + dex_modifier.min(cap),
        Some(armor) => armor.base_ac + dex_modifier,
    };

    let shield = armor_of(EquipmentCategory::Shield).map_or(0, |s| s.base_ac);
    body + shield
}

impl Character {
    pub fn armor_class(&self, equipped: &[EquippedItem]) -> i32 {
        armor_class(self.ability_modifier(Ability::Dex), equipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armor(base_ac: i32, add_dex_modifier: bool, max_dex_bonus: Option<i32>) -> EquippedItem {
        EquippedItem {
            id: format!("armor_{}", base_ac),
            name: "Armor".into(),
            category: EquipmentCategory::Armor,
            armor: Some(ArmorDetails {
                base_ac,
                add_dex_modifier,
                max_dex_bonus,
            }),
        }
    }

    fn shield() -> EquippedItem {
        EquippedItem {
            id: "shield".into(),
            name: "Shield".into(),
            category: EquipmentCategory::Shield,
            armor: Some(ArmorDetails {
                base_ac: 2,
                add_dex_modifier: false,
                max_dex_bonus: None,
            }),
        }
    }

    #[test]
    fn unarmored() {
        assert_eq!(armor_class(3, &[]), 13);
        assert_eq!(armor_class(-1, &[]), 9);
    }

    #[test]
    fn armor_formulas() {
        // leather, scale mail, plate
        assert_eq!(armor_class(3, &[armor(11, true, None)]), 14);
        assert_eq!(armor_class(3, &[armor(14, true, Some(2))]), 16);
        assert_eq!(armor_class(-1, &[armor(14, true, Some(2))]), 13);
        assert_eq!(armor_class(3, &[armor(18, false, None)]), 18);
    }

    #[test]
    fn shield_stacks_with_armor_or_dex() {
        assert_eq!(armor_class(2, &[shield()]), 14);
        assert_eq!(armor_class(2, &[armor(18, false, None), shield()]), 20);
    }

    #[test]
    fn items_without_armor_data_are_ignored() {
        let cloak = EquippedItem {
            id: "cloak".into(),
            name: "Cloak".into(),
            category: EquipmentCategory::Armor,
            armor: None,
        };
        assert_eq!(armor_class(1, &[cloak.clone()]), 11);
        assert_eq!(armor_class(1, &[cloak, armor(16, false, None)]), 16);
    }
}
