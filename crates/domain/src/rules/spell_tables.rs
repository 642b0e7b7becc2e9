//! Spell slot, cantrip and spells-known progression tables.

use std::collections::BTreeMap;

use super::classes::{CasterType, CharacterClass};

/// Pact magic pool for a warlock level: how many slots, and their level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PactSlotTable {
    pub total: u8,
    pub slot_level: u8,
}

/// Ordinary spell slots (slot level -> count) for a class at a level.
///
/// Pact magic is not an ordinary slot pool: warlocks get an empty map
/// here and read [`pact_magic_slots`] instead.
pub fn spell_slots(class: CharacterClass, level: u8) -> BTreeMap<u8, u8> {
    slots_for_caster(class.data().caster_type, level)
}

/// Ordinary slot progression for a caster type.
pub fn slots_for_caster(caster_type: CasterType, level: u8) -> BTreeMap<u8, u8> {
    let row = match caster_type {
        CasterType::Full => lookup(FULL_CASTER_SLOTS, level),
        CasterType::Half => lookup(HALF_CASTER_SLOTS, level),
        CasterType::Third => lookup(THIRD_CASTER_SLOTS, level),
        CasterType::Pact | CasterType::None => None,
    };

    row.map(|counts| {
        counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(i, &count)| ((i + 1) as u8, count))
            .collect()
    })
    .unwrap_or_default()
}

/// Warlock pact magic at a level, or `None` outside 1..=20.
pub fn pact_magic_slots(level: u8) -> Option<PactSlotTable> {
    let (total, slot_level) = match level {
        1 => (1, 1),
        2 => (2, 1),
        3..=4 => (2, 2),
        5..=6 => (2, 3),
        7..=8 => (2, 4),
        9..=10 => (2, 5),
        11..=16 => (3, 5),
        17..=20 => (4, 5),
        _ => return None,
    };
    Some(PactSlotTable { total, slot_level })
}

/// Highest spell level the class can cast at a level (0 for none).
pub fn max_spell_level(class: CharacterClass, level: u8) -> u8 {
    match class.data().caster_type {
        CasterType::Pact => pact_magic_slots(level).map(|p| p.slot_level).unwrap_or(0),
        other => slots_for_caster(other, level)
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0),
    }
}

/// Cantrips known at a level.
pub fn cantrips_known(class: CharacterClass, level: u8) -> u8 {
    let tiers: (u8, u8, u8) = match class {
        CharacterClass::Bard | CharacterClass::Druid | CharacterClass::Warlock => (2, 3, 4),
        CharacterClass::Cleric | CharacterClass::Wizard => (3, 4, 5),
        CharacterClass::Sorcerer => (4, 5, 6),
        _ => return 0,
    };
    match level {
        0 => 0,
        1..=3 => tiers.0,
        4..=9 => tiers.1,
        _ => tiers.2,
    }
}

/// Spells known at a level for classes that learn a fixed list.
///
/// Returns `None` for prepared casters, which have no known-spell limit.
pub fn spells_known(class: CharacterClass, level: u8) -> Option<u8> {
    let table = match class {
        CharacterClass::Bard => BARD_SPELLS_KNOWN,
        CharacterClass::Ranger => RANGER_SPELLS_KNOWN,
        CharacterClass::Sorcerer => SORCERER_SPELLS_KNOWN,
        CharacterClass::Warlock => WARLOCK_SPELLS_KNOWN,
        _ => return None,
    };
    Some(table.get(level as usize).copied().unwrap_or(table[20]))
}

fn lookup(table: &'static [(u8, &'static [u8])], level: u8) -> Option<&'static [u8]> {
    table.iter().find(|(l, _)| *l == level).map(|(_, s)| *s)
}

// Spell slot progression tables

const FULL_CASTER_SLOTS: &[(u8, &[u8])] = &[
    (1, &[2]),
    (2, &[3]),
    (3, &[4, 2]),
    (4, &[4, 3]),
    (5, &[4, 3, 2]),
    (6, &[4, 3, 3]),
    (7, &[4, 3, 3, 1]),
    (8, &[4, 3, 3, 2]),
    (9, &[4, 3, 3, 3, 1]),
    (10, &[4, 3, 3, 3, 2]),
    (11, &[4, 3, 3, 3, 2, 1]),
    (12, &[4, 3, 3, 3, 2, 1]),
    (13, &[4, 3, 3, 3, 2, 1, 1]),
    (14, &[4, 3, 3, 3, 2, 1, 1]),
    (15, &[4, 3, 3, 3, 2, 1, 1, 1]),
    (16, &[4, 3, 3, 3, 2, 1, 1, 1]),
    (17, &[4, 3, 3, 3, 2, 1, 1, 1, 1]),
    (18, &[4, 3, 3, 3, 3, 1, 1, 1, 1]),
    (19, &[4, 3, 3, 3, 3, 2, 1, 1, 1]),
    (20, &[4, 3, 3, 3, 3, 2, 2, 1, 1]),
];

// Half casters get slots at half rate (starting at level 2)
const HALF_CASTER_SLOTS: &[(u8, &[u8])] = &[
    (2, &[2]),
    (3, &[3]),
    (4, &[3]),
    (5, &[4, 2]),
    (6, &[4, 2]),
    (7, &[4, 3]),
    (8, &[4, 3]),
    (9, &[4, 3, 2]),
    (10, &[4, 3, 2]),
    (11, &[4, 3, 3]),
    (12, &[4, 3, 3]),
    (13, &[4, 3, 3, 1]),
    (14, &[4, 3, 3, 1]),
    (15, &[4, 3, 3, 2]),
    (16, &[4, 3, 3, 2]),
    (17, &[4, 3, 3, 3, 1]),
    (18, &[4, 3, 3, 3, 1]),
    (19, &[4, 3, 3, 3, 2]),
    (20, &[4, 3, 3, 3, 2]),
];

const THIRD_CASTER_SLOTS: &[(u8, &[u8])] = &[
    (3, &[2]),
    (4, &[3]),
    (5, &[3]),
    (6, &[3]),
    (7, &[4, 2]),
    (8, &[4, 2]),
    (9, &[4, 2]),
    (10, &[4, 3]),
    (11, &[4, 3]),
    (12, &[4, 3]),
    (13, &[4, 3, 2]),
    (14, &[4, 3, 2]),
    (15, &[4, 3, 2]),
    (16, &[4, 3, 3]),
    (17, &[4, 3, 3]),
    (18, &[4, 3, 3]),
    (19, &[4, 3, 3, 1]),
    (20, &[4, 3, 3, 1]),
];

// Spells known tables (level 1 = index 1)
const SORCERER_SPELLS_KNOWN: &[u8] = &[
    0, // level 0 (unused)
    2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 12, 13, 13, 14, 14, 15, 15, 15, 15,
];

const BARD_SPELLS_KNOWN: &[u8] = &[
    0, // level 0
    4, 5, 6, 7, 8, 9, 10, 11, 12, 14, 15, 15, 16, 18, 19, 19, 20, 22, 22, 22,
];

const RANGER_SPELLS_KNOWN: &[u8] = &[
    0, // level 0
    0, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11,
];

const WARLOCK_SPELLS_KNOWN: &[u8] = &[
    0, // level 0
    2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 11, 11, 12, 12, 13, 13, 14, 14, 15, 15,
];
