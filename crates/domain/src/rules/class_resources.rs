//! Class-specific limited resources (rage, ki, action surge, ...).
//!
//! Each class with resources registers a factory producing the full set for
//! a level. Classes without an entry have none.

use serde::{Deserialize, Serialize};

use super::classes::CharacterClass;

/// Stand-in maximum for resources that become unlimited.
pub const UNLIMITED_RESOURCE: u32 = 999;

/// When a class resource refills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceRecovery {
    ShortRest,
    LongRest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassResource {
    pub id: String,
    pub name: String,
    pub max: u32,
    pub current: u32,
    pub recovery: ResourceRecovery,
}

impl ClassResource {
    fn full(id: &str, name: &str, max: u32, recovery: ResourceRecovery) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            max,
            current: max,
            recovery,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.max >= UNLIMITED_RESOURCE
    }
}

type ClassResourceFactory = fn(u8) -> Vec<ClassResource>;

fn factory(class: CharacterClass) -> Option<ClassResourceFactory> {
    match class {
        CharacterClass::Barbarian => Some(barbarian_resources),
        CharacterClass::Fighter => Some(fighter_resources),
        CharacterClass::Monk => Some(monk_resources),
        CharacterClass::Rogue => Some(rogue_resources),
        _ => None,
    }
}

/// Every resource a class has at a level, all at full.
pub fn resources_for_level(class: CharacterClass, level: u8) -> Vec<ClassResource> {
    factory(class).map(|f| f(level)).unwrap_or_default()
}

/// Rage uses per day; `None` means unlimited.
pub fn rage_uses(level: u8) -> Option<u32> {
    match level {
        0..=2 => Some(2),
        3..=5 => Some(3),
        6..=11 => Some(4),
        12..=16 => Some(5),
        17..=19 => Some(6),
        _ => None,
    }
}

fn barbarian_resources(level: u8) -> Vec<ClassResource> {
    let max = rage_uses(level).unwrap_or(UNLIMITED_RESOURCE);
    vec![ClassResource::full("rage", "Rage", max, ResourceRecovery::LongRest)]
}

fn fighter_resources(level: u8) -> Vec<ClassResource> {
    let mut resources = vec![ClassResource::full(
        "second_wind",
        "Second Wind",
        1,
        ResourceRecovery::ShortRest,
    )];
    if level >= 2 {
        let max = if level >= 17 { 2 } else { 1 };
        resources.push(ClassResource::full(
            "action_surge",
            "Action Surge",
            max,
            ResourceRecovery::ShortRest,
        ));
    }
    if level >= 9 {
        let max = match level {
            17.. => 3,
            13.. => 2,
            _ => 1,
        };
        resources.push(ClassResource::full(
            "indomitable",
            "Indomitable",
            max,
            ResourceRecovery::LongRest,
        ));
    }
    resources
}

fn monk_resources(level: u8) -> Vec<ClassResource> {
    if level < 2 {
        return Vec::new();
    }
    vec![ClassResource::full(
        "ki",
        "Ki Points",
        u32::from(level),
        ResourceRecovery::ShortRest,
    )]
}

fn rogue_resources(level: u8) -> Vec<ClassResource> {
    if level < 20 {
        return Vec::new();
    }
    vec![ClassResource::full(
        "stroke_of_luck",
        "Stroke of Luck",
        1,
        ResourceRecovery::ShortRest,
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_of(resources: &[ClassResource], id: &str) -> Option<u32> {
        resources.iter().find(|r| r.id == id).map(|r| r.max)
    }

    #[test]
    fn rage_progression() {
        assert_eq!(rage_uses(1), Some(2));
        assert_eq!(rage_uses(3), Some(3));
        assert_eq!(rage_uses(6), Some(4));
        assert_eq!(rage_uses(12), Some(5));
        assert_eq!(rage_uses(17), Some(6));
        assert_eq!(rage_uses(20), None);

        let at_twenty = resources_for_level(CharacterClass::Barbarian, 20);
        assert_eq!(max_of(&at_twenty, "rage"), Some(UNLIMITED_RESOURCE));
        assert!(at_twenty[0].is_unlimited());
    }

    #[test]
    fn fighter_resources_by_level() {
        let one = resources_for_level(CharacterClass::Fighter, 1);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].recovery, ResourceRecovery::ShortRest);

        let nine = resources_for_level(CharacterClass::Fighter, 9);
        assert_eq!(max_of(&nine, "action_surge"), Some(1));
        assert_eq!(max_of(&nine, "indomitable"), Some(1));

        let seventeen = resources_for_level(CharacterClass::Fighter, 17);
        assert_eq!(max_of(&seventeen, "action_surge"), Some(2));
        assert_eq!(max_of(&seventeen, "indomitable"), Some(3));
    }

    #[test]
    fn ki_and_stroke_of_luck() {
        assert!(resources_for_level(CharacterClass::Monk, 1).is_empty());
        assert_eq!(max_of(&resources_for_level(CharacterClass::Monk, 7), "ki"), Some(7));
        assert!(resources_for_level(CharacterClass::Rogue, 19).is_empty());
        assert_eq!(
            max_of(&resources_for_level(CharacterClass::Rogue, 20), "stroke_of_luck"),
            Some(1)
        );
    }

    #[test]
    fn classes_without_resources() {
        assert!(resources_for_level(CharacterClass::Wizard, 10).is_empty());
        assert!(resources_for_level(CharacterClass::Sorcerer, 10).is_empty());
    }
}
