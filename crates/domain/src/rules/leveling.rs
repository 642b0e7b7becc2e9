//! Level progression rules: XP thresholds, proficiency, ASI levels and
//! the per-level summary the level-up planner is built from.

use serde::{Deserialize, Serialize};

use super::class_features::{features_for_level, ClassFeature};
use super::classes::{CasterType, CharacterClass, SpellPreparation};
use super::spell_tables::{cantrips_known, max_spell_level, spells_known};

/// Highest character level.
pub const MAX_LEVEL: u8 = 20;

/// XP needed to reach level 20; experience is not tracked beyond it.
pub const MAX_XP: u32 = 355_000;

/// Points handed out by one Ability Score Improvement.
pub const ASI_POINTS: i32 = 2;

/// Spellbook entries a wizard adds on every level-up.
pub const WIZARD_SPELLBOOK_SPELLS_PER_LEVEL: u8 = 2;

/// XP thresholds for each level.
/// Index is level - 1 (so level 1 = index 0).
const XP_THRESHOLDS: [u32; 20] = [
    0,       // Level 1
    300,     // Level 2
    900,     // Level 3
    2_700,   // Level 4
    6_500,   // Level 5
    14_000,  // Level 6
    23_000,  // Level 7
    34_000,  // Level 8
    48_000,  // Level 9
    64_000,  // Level 10
    85_000,  // Level 11
    100_000, // Level 12
    120_000, // Level 13
    140_000, // Level 14
    165_000, // Level 15
    195_000, // Level 16
    225_000, // Level 17
    265_000, // Level 18
    305_000, // Level 19
    355_000, // Level 20
];

const DEFAULT_ASI_LEVELS: &[u8] = &[4, 8, 12, 16, 19];
const FIGHTER_ASI_LEVELS: &[u8] = &[4, 6, 8, 12, 14, 16, 19];
const ROGUE_ASI_LEVELS: &[u8] = &[4, 8, 10, 12, 16, 19];

/// XP required to reach a level (0 outside 1..=20).
pub fn xp_for_level(level: u8) -> u32 {
    if level == 0 || level > MAX_LEVEL {
        return 0;
    }
    XP_THRESHOLDS[(level - 1) as usize]
}

/// XP required for the level after `current_level`, or `None` at the cap.
pub fn xp_for_next_level(current_level: u8) -> Option<u32> {
    if current_level >= MAX_LEVEL {
        return None;
    }
    Some(xp_for_level(current_level + 1))
}

/// Level reached with `xp` experience.
pub fn level_for_xp(xp: u32) -> u8 {
    XP_THRESHOLDS
        .iter()
        .rposition(|&threshold| xp >= threshold)
        .map(|i| (i + 1) as u8)
        .unwrap_or(1)
}

/// Fraction of the way from the current level's threshold to the next.
///
/// Always 1.0 at the level cap.
pub fn xp_progress(xp: u32, current_level: u8) -> f64 {
    let Some(next) = xp_for_next_level(current_level) else {
        return 1.0;
    };
    let floor = xp_for_level(current_level);
    let span = next.saturating_sub(floor);
    if span == 0 {
        return 1.0;
    }
    (f64::from(xp.saturating_sub(floor)) / f64::from(span)).clamp(0.0, 1.0)
}

/// Whether a character with `xp` has earned the next level.
pub fn can_level_up(xp: u32, current_level: u8) -> bool {
    match xp_for_next_level(current_level) {
        Some(needed) => xp >= needed,
        None => false,
    }
}

/// Proficiency bonus for a character level.
pub fn proficiency_bonus(level: u8) -> i32 {
    ((i32::from(level.max(1)) - 1) / 4) + 2
}

/// Levels at which a class gains an Ability Score Improvement.
pub fn asi_levels(class: CharacterClass) -> &'static [u8] {
    match class {
        CharacterClass::Fighter => FIGHTER_ASI_LEVELS,
        CharacterClass::Rogue => ROGUE_ASI_LEVELS,
        _ => DEFAULT_ASI_LEVELS,
    }
}

pub fn is_asi_level(class: CharacterClass, level: u8) -> bool {
    asi_levels(class).contains(&level)
}

pub fn is_subclass_level(class: CharacterClass, level: u8) -> bool {
    class.data().subclass_level == level
}

/// New metamagic options a sorcerer picks at a level.
pub fn new_metamagic_choices(class: CharacterClass, level: u8) -> u8 {
    if class != CharacterClass::Sorcerer {
        return 0;
    }
    match level {
        3 => 2,
        10 | 17 => 1,
        _ => 0,
    }
}

/// How spells are gained, for display and for the spells step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreparationType {
    Known,
    Prepared,
    Spellbook,
    Pact,
    None,
}

/// What a caster learns when reaching a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellLearningInfo {
    pub new_cantrips: u8,
    pub new_spells_known: u8,
    pub new_spellbook_spells: u8,
    /// A known-spell caster may trade one known spell for another.
    pub can_swap_spell: bool,
    pub max_spell_level: u8,
    pub preparation_type: PreparationType,
    pub gains_new_spell_level: bool,
    pub total_cantrips: u8,
    pub total_spells_known: u8,
}

impl SpellLearningInfo {
    /// Whether the level-up needs a spell selection step.
    pub fn requires_choices(&self) -> bool {
        self.new_cantrips > 0
            || self.new_spells_known > 0
            || self.new_spellbook_spells > 0
            || self.can_swap_spell
    }
}

/// Spell learning for reaching `new_level`, or `None` for non-casters.
pub fn spell_learning_info(class: CharacterClass, new_level: u8) -> Option<SpellLearningInfo> {
    let data = class.data();
    if !data.is_caster() {
        return None;
    }

    let old_level = new_level.saturating_sub(1);

    let total_cantrips = cantrips_known(class, new_level);
    let new_cantrips = total_cantrips.saturating_sub(cantrips_known(class, old_level));

    let total_spells_known = spells_known(class, new_level).unwrap_or(0);
    let old_spells_known = if old_level == 0 {
        0
    } else {
        spells_known(class, old_level).unwrap_or(0)
    };
    let new_spells_known = total_spells_known.saturating_sub(old_spells_known);

    let new_spellbook_spells = if class == CharacterClass::Wizard {
        WIZARD_SPELLBOOK_SPELLS_PER_LEVEL
    } else {
        0
    };

    let can_swap_spell = data.preparation == SpellPreparation::Known && new_level > 1;

    let max_level = max_spell_level(class, new_level);
    let gains_new_spell_level = max_level > max_spell_level(class, old_level);

    let preparation_type = match (data.caster_type, data.preparation) {
        (CasterType::Pact, _) => PreparationType::Pact,
        (_, SpellPreparation::Spellbook) => PreparationType::Spellbook,
        (_, SpellPreparation::Prepared) => PreparationType::Prepared,
        (_, SpellPreparation::Known) => PreparationType::Known,
        (_, SpellPreparation::None) => PreparationType::None,
    };

    let has_any_change = new_cantrips > 0
        || new_spells_known > 0
        || new_spellbook_spells > 0
        || can_swap_spell
        || gains_new_spell_level
        || total_cantrips > 0
        || total_spells_known > 0;
    if !has_any_change {
        return None;
    }

    Some(SpellLearningInfo {
        new_cantrips,
        new_spells_known,
        new_spellbook_spells,
        can_swap_spell,
        max_spell_level: max_level,
        preparation_type,
        gains_new_spell_level,
        total_cantrips,
        total_spells_known,
    })
}

/// Everything a level grants, computed from the tables alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpSummary {
    pub class: CharacterClass,
    pub new_level: u8,
    pub features: Vec<ClassFeature>,
    pub has_asi: bool,
    pub chooses_subclass: bool,
    pub proficiency_bonus: i32,
    pub xp_threshold: u32,
    pub spell_learning: Option<SpellLearningInfo>,
    pub new_metamagic_choices: u8,
}

/// Summary of what reaching `new_level` grants a class.
pub fn level_up_summary(class: CharacterClass, new_level: u8) -> LevelUpSummary {
    LevelUpSummary {
        class,
        new_level,
        features: features_for_level(class, new_level),
        has_asi: is_asi_level(class, new_level),
        chooses_subclass: is_subclass_level(class, new_level),
        proficiency_bonus: proficiency_bonus(new_level),
        xp_threshold: xp_for_level(new_level),
        spell_learning: spell_learning_info(class, new_level),
        new_metamagic_choices: new_metamagic_choices(class, new_level),
    }
}
