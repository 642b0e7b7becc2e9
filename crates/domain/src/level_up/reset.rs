use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::entities::{
    Character, ClassResourcesState, DeathSaves, HitDicePool, HitPoints, LevelUpRecord, MagicState,
    TraitOrigin,
};
use crate::rules::{features_for_level, proficiency_bonus, CharacterClass};
use crate::value_objects::Ability;

/// Return the character to level 1, undoing every level-up.
///
/// Ability improvements, extra HP, subclass, later traits and later spells
/// are dropped; race, background, feat and manual traits survive. Magic and
/// class resources come back fresh. Returns false, changing nothing, for a
/// character already at level 1.
pub fn reset_to_level_one(
    character: &mut Character,
    magic: &mut MagicState,
    resources: &mut ClassResourcesState,
    now: DateTime<Utc>,
) -> bool {
    if character.level <= 1 {
        return false;
    }
    let class = character.class;

    for ability in Ability::ALL {
        let score = character.abilities.get_mut(ability);
        score.improvement = 0;
        score.recompute();
    }
    let level_one_hp = class
        .data()
        .level_one_hp(character.abilities.modifier(Ability::Con));

    let level_one = character.level_one_record().cloned();
    let level_one_spells = level_one
        .as_ref()
        .map(|r| r.spells_learned.clone())
        .unwrap_or_default();

    let level_one_traits: BTreeSet<String> = match &level_one {
        Some(record) => record.traits_gained.iter().cloned().collect(),
        None => features_for_level(class, 1)
            .into_iter()
            .filter(|f| !f.is_subclass)
            .map(|f| f.name)
            .collect(),
    };
    character.traits.retain(|t| match t.origin {
        TraitOrigin::Race | TraitOrigin::Background | TraitOrigin::Feat | TraitOrigin::Manual => true,
        TraitOrigin::Class => level_one_traits.contains(&t.name),
        TraitOrigin::Subclass => false,
    });

    character.level = 1;
    character.experience = 0;
    character.subclass = None;
    character.proficiency_bonus = proficiency_bonus(1);
    character.hp = HitPoints::full(level_one_hp);
    character.hit_dice = HitDicePool {
        die: character.hit_dice.die,
        total: 1,
        remaining: 1,
    };
    character.death_saves = DeathSaves::default();
    character.conditions.clear();
    character.concentration = None;
    character.level_history = vec![match level_one {
        Some(record) => LevelUpRecord {
            hp_gained: level_one_hp,
            ..record
        },
        None => LevelUpRecord::level_one(level_one_hp, level_one_traits.into_iter().collect(), now),
    }];
    character.spellbook_ids = if class == CharacterClass::Wizard {
        level_one_spells.clone()
    } else {
        Vec::new()
    };
    character.prepared_spell_ids = level_one_spells.clone();
    character.known_spell_ids = level_one_spells;
    character.updated_at = now;

    let favorites = std::mem::take(&mut magic.favorite_spell_ids);
    *magic = MagicState::default_for(character);
    let favorites: Vec<String> = favorites
        .into_iter()
        .filter(|id| magic.known_spell_ids.contains(id))
        .collect();
    magic.favorite_spell_ids = favorites;
    *resources = ClassResourcesState::for_level(class, 1);
    true
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::entities::test_support::{character, fighter, fixed_now};
    use crate::entities::CharacterTrait;
    use crate::level_up::{apply_level_up, LevelUpOptions};
    use crate::value_objects::{AbilityScore, Condition};

    #[test]
    fn level_one_is_a_no_op() {
        let mut c = fighter();
        let mut magic = MagicState::default_for(&c);
        let mut resources = ClassResourcesState::for_level(c.class, 1);
        let before = c.clone();
        assert!(!reset_to_level_one(&mut c, &mut magic, &mut resources, fixed_now()));
        assert_eq!(c, before);
    }

    #[test]
    fn undoes_level_ups() {
        let mut c = fighter();
        c.abilities.constitution = AbilityScore::with_parts(13, 1, 0, 0, None);
        c.traits.push(CharacterTrait::passive("darkvision", "Darkvision", "See in the dark.", TraitOrigin::Race));
        c.traits.push(CharacterTrait::passive("lucky", "Lucky", "Reroll.", TraitOrigin::Feat));
        let mut magic = MagicState::default_for(&c);
        let mut resources = ClassResourcesState::for_level(c.class, 1);

        for _ in 0..2 {
            apply_level_up(&mut c, &mut magic, &mut resources, &LevelUpOptions::fixed(), fixed_now()).unwrap();
        }
        let options = LevelUpOptions {
            subclass_chosen: Some("champion".into()),
            ..LevelUpOptions::fixed()
        };
        apply_level_up(&mut c, &mut magic, &mut resources, &options, fixed_now()).unwrap();
        let options = LevelUpOptions {
            ability_improvements: [(Ability::Con, 2)].into(),
            ..LevelUpOptions::fixed()
        };
        apply_level_up(&mut c, &mut magic, &mut resources, &options, fixed_now()).unwrap();
        assert_eq!(c.level, 4);
        assert_eq!(c.subclass.as_deref(), Some("Champion"));

        c.add_condition(Condition::Poisoned, None, fixed_now());
        c.set_experience(3_000, fixed_now());
        let later = fixed_now() + Duration::hours(1);
        assert!(reset_to_level_one(&mut c, &mut magic, &mut resources, later));

        assert_eq!(c.level, 1);
        assert_eq!(c.experience, 0);
        assert!(c.subclass.is_none());
        assert_eq!(c.abilities.constitution.improvement, 0);
        assert_eq!(c.abilities.constitution.total, 14);
        assert_eq!(c.hp, HitPoints::full(12));
        assert_eq!((c.hit_dice.total, c.hit_dice.remaining), (1, 1));
        assert!(c.conditions.is_empty());
        assert_eq!(c.proficiency_bonus, 2);
        assert_eq!(c.updated_at, later);

        let names: Vec<&str> = c.traits.iter().map(|t| t.name.as_str()).collect();
        assert!(names.contains(&"Darkvision"));
        assert!(names.contains(&"Lucky"));
        assert!(names.contains(&"Second Wind"));
        assert!(!names.contains(&"Action Surge"));
        assert!(c.traits.iter().all(|t| t.origin != TraitOrigin::Subclass));

        assert_eq!(c.level_history.len(), 1);
        assert_eq!(c.level_history[0].level, 1);
        assert_eq!(c.level_history[0].hp_gained, 12);
        assert!(resources.get("action_surge").is_none());
        assert_eq!(resources.get("second_wind").map(|r| r.current), Some(1));
    }

    #[test]
    fn restores_level_one_spells() {
        let mut c = character(CharacterClass::Wizard)
            .with_starting_spells(vec!["magic_missile".into(), "shield".into()]);
        let mut magic = MagicState::default_for(&c);
        let mut resources = ClassResourcesState::for_level(c.class, 1);
        let options = LevelUpOptions {
            subclass_chosen: Some("evocation".into()),
            spellbook_added: vec!["sleep".into(), "burning_hands".into()],
            ..LevelUpOptions::fixed()
        };
        apply_level_up(&mut c, &mut magic, &mut resources, &options, fixed_now()).unwrap();
        assert!(magic.use_spell_slot(1));
        magic.toggle_favorite("shield");
        magic.toggle_favorite("sleep");
        c.prepared_spell_ids.clear();

        assert!(reset_to_level_one(&mut c, &mut magic, &mut resources, fixed_now()));
        assert_eq!(c.spellbook_ids, vec!["magic_missile", "shield"]);
        assert_eq!(c.known_spell_ids, c.spellbook_ids);
        assert_eq!(c.prepared_spell_ids, c.spellbook_ids);
        assert_eq!(magic.known_spell_ids, c.known_spell_ids);
        assert_eq!(magic.spell_slots.get(&1).map(|p| (p.total, p.used)), Some((2, 0)));
        assert_eq!(magic.favorite_spell_ids, vec!["shield".to_string()]);
    }

    #[test]
    fn non_wizard_has_no_spellbook_after_reset() {
        let mut c = character(CharacterClass::Cleric).with_starting_spells(vec!["bless".into()]);
        c.level = 2;
        c.spellbook_ids = vec!["stray".into()];
        let mut magic = MagicState::default_for(&c);
        let mut resources = ClassResourcesState::default();
        assert!(reset_to_level_one(&mut c, &mut magic, &mut resources, fixed_now()));
        assert!(c.spellbook_ids.is_empty());
        assert_eq!(c.known_spell_ids, vec!["bless"]);
    }
}
