//! Committing a level-up.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::options::{hp_gain, LevelUpOptions};
use super::plan::LevelUpPlan;
use crate::entities::{
    class_trait_id, merge_unique, Character, CharacterTrait, ClassResourcesState, LevelUpRecord,
    MagicState, TraitOrigin,
};
use crate::error::DomainError;
use crate::rules::{proficiency_bonus, render_feature_description, LevelUpSummary, MAX_LEVEL};
use crate::value_objects::Ability;

/// What a committed level-up changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpOutcome {
    pub summary: LevelUpSummary,
    pub hp_gained: i32,
    /// Extra HP for earlier levels when CON's modifier went up.
    pub retroactive_hp: i32,
    pub record: LevelUpRecord,
}

/// Apply one level to the character and its resources.
///
/// Every step of the level's plan is validated first; on error nothing has
/// been touched.
pub fn apply_level_up(
    character: &mut Character,
    magic: &mut MagicState,
    resources: &mut ClassResourcesState,
    options: &LevelUpOptions,
    now: DateTime<Utc>,
) -> Result<LevelUpOutcome, DomainError> {
    let plan = LevelUpPlan::for_character(character, magic).ok_or_else(|| {
        DomainError::invalid_state_transition(format!("Already at level {}", MAX_LEVEL))
    })?;
    plan.validate(options)?;

    let old_level = character.level;
    let new_level = plan.new_level();
    let class = character.class;

    let old_con = character.ability_modifier(Ability::Con);
    let hp_gained = hp_gain(plan.hit_die, options.hp_method, options.hp_rolled, old_con)?;

    let mut abilities = character.abilities.clone();
    for (ability, points) in &options.ability_improvements {
        let score = abilities.get_mut(*ability);
        score.improvement += points;
        score.recompute();
    }
    let con_diff = abilities.modifier(Ability::Con) - old_con;
    let retroactive_hp = if con_diff > 0 {
        con_diff * i32::from(old_level)
    } else {
        0
    };

    // A catalog subclass is stored under its display name.
    let chosen_subclass = options.subclass_chosen.as_ref().map(|chosen| {
        plan.subclass_definition(options)
            .map(|d| d.name.to_string())
            .unwrap_or_else(|| chosen.trim().to_string())
    });
    let subclass = chosen_subclass.clone().or_else(|| character.subclass.clone());
    let new_traits = build_traits(character, &plan, options, subclass.is_some());

    let record = LevelUpRecord {
        level: new_level,
        date: now,
        hp_gained,
        hp_method: options.hp_method,
        ability_improvements: options
            .ability_improvements
            .iter()
            .filter(|(_, points)| **points != 0)
            .map(|(a, p)| (*a, *p))
            .collect(),
        subclass_chosen: chosen_subclass,
        subclass_feature_choices: options.subclass_feature_choices.clone(),
        spells_learned: options.all_spells_learned(),
        spells_swapped: options.spell_swapped.iter().cloned().collect(),
        traits_gained: new_traits.iter().map(|t| t.name.clone()).collect(),
    };

    // Validation is done; from here on every change is infallible.
    character.level = new_level;
    character.proficiency_bonus = proficiency_bonus(new_level);
    character.abilities = abilities;
    character.subclass = subclass;
    character.hp.max += hp_gained + retroactive_hp;
    character.hp.current = (character.hp.current + hp_gained + retroactive_hp).min(character.hp.max);
    character.hit_dice.total = new_level;
    character.hit_dice.remaining = (character.hit_dice.remaining + 1).min(new_level);
    character.traits.extend(new_traits);
    character.level_history.push(record.clone());
    character.updated_at = now;

    resources.rebuild_for_level(class, new_level);
    apply_magic(magic, character, options);

    Ok(LevelUpOutcome {
        summary: plan.summary,
        hp_gained,
        retroactive_hp,
        record,
    })
}

fn build_traits(
    character: &Character,
    plan: &LevelUpPlan,
    options: &LevelUpOptions,
    has_subclass: bool,
) -> Vec<CharacterTrait> {
    let new_level = plan.new_level();
    let mut traits: Vec<CharacterTrait> = Vec::new();
    let mut push = |t: CharacterTrait| {
        let taken = character.traits.iter().chain(traits.iter()).any(|x| x.id == t.id);
        if !taken {
            traits.push(t);
        }
    };

    for feature in &plan.summary.features {
        if feature.is_subclass && !has_subclass {
            continue;
        }
        let origin = if feature.is_subclass {
            TraitOrigin::Subclass
        } else {
            TraitOrigin::Class
        };
        push(CharacterTrait::passive(
            class_trait_id(character.class, &feature.name, new_level),
            feature.name.clone(),
            feature.description.clone(),
            origin,
        ));
    }

    if let Some(definition) = plan.subclass_definition(options) {
        for feature in definition.features_at(new_level) {
            push(CharacterTrait::passive(
                class_trait_id(character.class, feature.name, new_level),
                feature.name,
                render_feature_description(feature, &options.subclass_feature_choices),
                TraitOrigin::Subclass,
            ));
        }
    }

    traits
}

fn apply_magic(magic: &mut MagicState, character: &mut Character, options: &LevelUpOptions) {
    magic.rebuild_for_level(character.class, character.level);

    merge_unique(
        &mut magic.known_spell_ids,
        options.cantrips_learned.iter().chain(&options.spells_learned),
    );
    merge_unique(&mut magic.spellbook_ids, &options.spellbook_added);

    if let Some(swap) = &options.spell_swapped {
        let already_known = magic.known_spell_ids.contains(&swap.learned);
        match magic.known_spell_ids.iter().position(|id| *id == swap.forgotten) {
            Some(pos) if !already_known => magic.known_spell_ids[pos] = swap.learned.clone(),
            Some(pos) => {
                magic.known_spell_ids.remove(pos);
            }
            None if !already_known => magic.known_spell_ids.push(swap.learned.clone()),
            None => {}
        }
        magic.prepared_spell_ids.retain(|id| *id != swap.forgotten);
    }

    if let Some(chosen) = magic.metamagic_chosen.as_mut() {
        merge_unique(chosen, &options.metamagic_chosen);
    }

    magic.sync_spell_ids(character);
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::entities::test_support::{character, fighter, fixed_now};
    use crate::entities::{HpMethod, SpellSwap};
    use crate::rules::{CharacterClass, FeatureChoiceSelection};
    use crate::value_objects::AbilityScore;

    fn parts(c: &Character) -> (MagicState, ClassResourcesState) {
        (
            MagicState::default_for(c),
            ClassResourcesState::for_level(c.class, c.level),
        )
    }

    #[test]
    fn fixed_level_two_fighter() {
        let mut c = fighter();
        let (mut magic, mut resources) = parts(&c);
        c.hp.current = 5;
        c.hit_dice.remaining = 0;

        let outcome =
            apply_level_up(&mut c, &mut magic, &mut resources, &LevelUpOptions::fixed(), fixed_now())
                .unwrap();

        // d10 fixed 6 + CON 2
        assert_eq!(outcome.hp_gained, 8);
        assert_eq!(c.level, 2);
        assert_eq!((c.hp.max, c.hp.current), (20, 13));
        assert_eq!((c.hit_dice.total, c.hit_dice.remaining), (2, 1));
        assert!(c.trait_by_id("fighter_action_surge_lv2").is_some());
        assert_eq!(resources.get("action_surge").map(|r| r.current), Some(1));
        assert_eq!(c.level_history.len(), 2);
        assert_eq!(c.level_history[1].traits_gained, vec!["Action Surge".to_string()]);
    }

    #[test]
    fn rolled_hp_uses_the_given_roll() {
        let mut c = fighter();
        let (mut magic, mut resources) = parts(&c);
        let outcome = apply_level_up(
            &mut c,
            &mut magic,
            &mut resources,
            &LevelUpOptions::rolled(3),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(outcome.hp_gained, 5);
        assert_eq!(outcome.record.hp_method, HpMethod::Roll);
    }

    #[test]
    fn asi_applies_with_retroactive_hp() {
        let mut c = fighter();
        c.level = 3;
        c.abilities.constitution = AbilityScore::new(15);
        let (mut magic, mut resources) = parts(&c);
        let max_before = c.hp.max;

        let options = LevelUpOptions {
            ability_improvements: BTreeMap::from([(Ability::Con, 1), (Ability::Str, 1)]),
            ..LevelUpOptions::fixed()
        };
        let outcome = apply_level_up(&mut c, &mut magic, &mut resources, &options, fixed_now()).unwrap();

        assert_eq!(c.abilities.constitution.total, 16);
        assert_eq!(c.abilities.constitution.improvement, 1);
        assert_eq!(c.abilities.strength.total, 16);
        // 6 + old CON 2, plus one extra HP for each of the three earlier levels
        assert_eq!(outcome.hp_gained, 8);
        assert_eq!(outcome.retroactive_hp, 3);
        assert_eq!(c.hp.max, max_before + 11);
    }

    #[test]
    fn invalid_options_change_nothing() {
        let mut c = fighter();
        c.level = 3;
        let (mut magic, mut resources) = parts(&c);
        let before = (c.clone(), magic.clone(), resources.clone());

        let options = LevelUpOptions {
            ability_improvements: BTreeMap::from([(Ability::Str, 1)]),
            ..LevelUpOptions::fixed()
        };
        assert!(apply_level_up(&mut c, &mut magic, &mut resources, &options, fixed_now()).is_err());
        assert_eq!((c, magic, resources), before);
    }

    #[test]
    fn level_twenty_is_rejected() {
        let mut c = fighter();
        c.level = MAX_LEVEL;
        let (mut magic, mut resources) = parts(&c);
        let err = apply_level_up(&mut c, &mut magic, &mut resources, &LevelUpOptions::fixed(), fixed_now())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition(_)));
    }

    #[test]
    fn subclass_choice_becomes_traits() {
        let mut c = character(CharacterClass::Ranger);
        c.level = 2;
        let (mut magic, mut resources) = parts(&c);
        let options = LevelUpOptions {
            subclass_chosen: Some("Hunter".into()),
            subclass_feature_choices: vec![FeatureChoiceSelection {
                choice_id: "hunter_prey".into(),
                selected_option_ids: vec!["horde_breaker".into()],
            }],
            spells_learned: vec!["cure_wounds".into()],
            ..LevelUpOptions::fixed()
        };
        apply_level_up(&mut c, &mut magic, &mut resources, &options, fixed_now()).unwrap();

        assert_eq!(c.subclass.as_deref(), Some("Hunter"));
        let archetype = c.trait_by_id("ranger_ranger_archetype_lv3").unwrap();
        assert_eq!(archetype.origin, TraitOrigin::Subclass);
        let prey = c.trait_by_id("ranger_hunter_s_prey_lv3").unwrap();
        assert!(prey.description.contains("Horde Breaker"));
        assert_eq!(c.known_spell_ids, vec!["cure_wounds".to_string()]);
        assert_eq!(c.level_history[1].subclass_feature_choices.len(), 1);
    }

    #[test]
    fn spells_merge_and_swap() {
        let mut c = character(CharacterClass::Sorcerer);
        c.level = 3;
        c.known_spell_ids = vec!["burning_hands".into(), "shield".into()];
        c.prepared_spell_ids = vec!["burning_hands".into()];
        let (mut magic, mut resources) = parts(&c);
        magic.metamagic_chosen = Some(vec!["twinned".into(), "subtle".into()]);

        let options = LevelUpOptions {
            ability_improvements: BTreeMap::from([(Ability::Cha, 2)]),
            cantrips_learned: vec!["light".into()],
            spells_learned: vec!["sleep".into()],
            spell_swapped: Some(SpellSwap {
                forgotten: "burning_hands".into(),
                learned: "thunderwave".into(),
            }),
            ..LevelUpOptions::fixed()
        };
        apply_level_up(&mut c, &mut magic, &mut resources, &options, fixed_now()).unwrap();

        assert_eq!(
            magic.known_spell_ids,
            vec!["thunderwave", "shield", "light", "sleep"]
        );
        assert!(magic.prepared_spell_ids.is_empty());
        assert_eq!(c.known_spell_ids, magic.known_spell_ids);
        assert_eq!(magic.sorcery_points.map(|p| p.max), Some(4));
        assert_eq!(magic.spell_slots.get(&2).map(|p| p.total), Some(3));
        assert_eq!(
            c.level_history.last().map(|r| r.spells_learned.clone()),
            Some(vec!["light".to_string(), "sleep".to_string()])
        );
    }

    #[test]
    fn relearning_a_known_spell_is_rejected() {
        let mut c = character(CharacterClass::Sorcerer);
        c.level = 3;
        c.known_spell_ids = vec!["burning_hands".into(), "shield".into()];
        let (mut magic, mut resources) = parts(&c);
        let before = (c.clone(), magic.clone());

        let options = LevelUpOptions {
            ability_improvements: BTreeMap::from([(Ability::Cha, 2)]),
            cantrips_learned: vec!["light".into()],
            spells_learned: vec!["shield".into()],
            ..LevelUpOptions::fixed()
        };
        let err = apply_level_up(&mut c, &mut magic, &mut resources, &options, fixed_now()).unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!((c, magic), before);
    }

    #[test]
    fn spent_resources_stay_spent_across_a_level() {
        let mut c = character(CharacterClass::Sorcerer);
        let (mut magic, mut resources) = parts(&c);
        assert!(magic.use_spell_slot(1));
        assert!(magic.spend_sorcery_points(1));

        let options = LevelUpOptions {
            spells_learned: vec!["sleep".into()],
            ..LevelUpOptions::fixed()
        };
        apply_level_up(&mut c, &mut magic, &mut resources, &options, fixed_now()).unwrap();

        assert_eq!(magic.spell_slots.get(&1).map(|p| (p.total, p.used)), Some((3, 1)));
        assert_eq!(magic.sorcery_points.map(|p| (p.max, p.current)), Some((2, 1)));
    }

    #[test]
    fn metamagic_is_appended() {
        let mut c = character(CharacterClass::Sorcerer);
        c.level = 2;
        let (mut magic, mut resources) = parts(&c);
        let options = LevelUpOptions {
            spells_learned: vec!["sleep".into()],
            metamagic_chosen: vec!["quickened".into(), "careful".into()],
            ..LevelUpOptions::fixed()
        };
        apply_level_up(&mut c, &mut magic, &mut resources, &options, fixed_now()).unwrap();
        assert_eq!(
            magic.metamagic_chosen,
            Some(vec!["quickened".to_string(), "careful".to_string()])
        );
    }

    #[test]
    fn wizard_spellbook_grows() {
        let mut c = character(CharacterClass::Wizard).with_starting_spells(vec!["magic_missile".into()]);
        let (mut magic, mut resources) = parts(&c);
        let options = LevelUpOptions {
            subclass_chosen: Some("evocation".into()),
            spellbook_added: vec!["shield".into(), "sleep".into()],
            ..LevelUpOptions::fixed()
        };
        apply_level_up(&mut c, &mut magic, &mut resources, &options, fixed_now()).unwrap();
        assert_eq!(c.spellbook_ids, vec!["magic_missile", "shield", "sleep"]);
        assert_eq!(c.subclass.as_deref(), Some("School of Evocation"));
        assert!(c.trait_by_id("wizard_sculpt_spells_lv2").is_some());
    }
}
