//! Short and long rests across the character, its magic and its class
//! resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Character, ClassResourcesState, CombatLogKind, MagicState, RechargeType};
use crate::ledger::hit_die_healing;
use crate::value_objects::Ability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortRestResult {
    /// Sum of the hit-die healing rolled, before clamping to max HP.
    pub hp_restored: i32,
    pub dice_used: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongRestResult {
    pub hp_restored: i32,
    pub hit_dice_restored: u8,
}

/// Hit dice regained on a long rest: half the total, at least one.
pub fn long_rest_hit_dice(total: u8) -> u8 {
    (total / 2).max(1)
}

impl Character {
    /// Refill every limited trait whose recharge is in `kinds`.
    pub fn recharge_traits(&mut self, kinds: &[RechargeType]) {
        for t in self.traits.iter_mut() {
            if t.max_uses.is_some() && kinds.contains(&t.recharge) {
                t.current_uses = t.max_uses;
            }
        }
    }
}

/// Spend up to `dice_to_spend` hit dice, then recover short-rest traits,
/// pact slots and short-rest class resources.
pub fn short_rest(
    character: &mut Character,
    magic: &mut MagicState,
    resources: &mut ClassResourcesState,
    dice_to_spend: u8,
    mut roll: impl FnMut(u8) -> u8,
    now: DateTime<Utc>,
) -> ShortRestResult {
    let sides = character.hit_dice.die.sides();
    let con = character.ability_modifier(Ability::Con);
    let dice_used = dice_to_spend.min(character.hit_dice.remaining);

    let hp_restored: i32 = (0..dice_used)
        .map(|_| hit_die_healing(roll(sides).clamp(1, sides), con))
        .sum();
    character.hit_dice.remaining -= dice_used;
    character.heal_clamped(hp_restored);

    character.recharge_traits(&[RechargeType::ShortRest]);
    magic.restore_all_pact_slots();
    resources.restore_short_rest();

    character.push_log(
        CombatLogKind::Rest,
        hp_restored,
        format!("Short rest: {} hit dice, {} HP", dice_used, hp_restored),
        now,
    );
    character.updated_at = now;

    ShortRestResult {
        hp_restored,
        dice_used,
    }
}

/// Full recovery: HP, half the hit dice, death saves, conditions,
/// concentration, every recharging trait, all slots, sorcery points and
/// class resources.
pub fn long_rest(
    character: &mut Character,
    magic: &mut MagicState,
    resources: &mut ClassResourcesState,
    now: DateTime<Utc>,
) -> LongRestResult {
    let hp_restored = character.hp.max - character.hp.current;
    character.hp.current = character.hp.max;
    character.hp.temp = 0;

    let before = character.hit_dice.remaining;
    character.hit_dice.remaining = before
        .saturating_add(long_rest_hit_dice(character.hit_dice.total))
        .min(character.hit_dice.total);
    let hit_dice_restored = character.hit_dice.remaining - before;

    character.death_saves = Default::default();
    character.conditions.clear();
    character.concentration = None;
    character.recharge_traits(&[
        RechargeType::ShortRest,
        RechargeType::LongRest,
        RechargeType::Dawn,
    ]);

    magic.restore_all_spell_slots();
    magic.restore_all_pact_slots();
    magic.restore_sorcery_points();
    resources.restore_all();

    character.push_log(
        CombatLogKind::Rest,
        hp_restored,
        format!("Long rest: {} HP, {} hit dice", hp_restored, hit_dice_restored),
        now,
    );
    character.updated_at = now;

    LongRestResult {
        hp_restored,
        hit_dice_restored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::test_support::{character, fighter, fixed_now};
    use crate::entities::{CharacterTrait, TraitOrigin};
    use crate::rules::CharacterClass;
    use crate::value_objects::Condition;

    fn parts(c: &Character) -> (MagicState, ClassResourcesState) {
        (
            MagicState::default_for(c),
            ClassResourcesState::for_level(c.class, c.level),
        )
    }

    fn with_traits(mut c: Character) -> Character {
        for (id, recharge) in [
            ("short", RechargeType::ShortRest),
            ("long", RechargeType::LongRest),
            ("dawn", RechargeType::Dawn),
        ] {
            let mut t = CharacterTrait::passive(id, id, "", TraitOrigin::Manual).limited(1, recharge);
            t.current_uses = Some(0);
            c.traits.push(t);
        }
        c
    }

    fn uses(c: &Character, id: &str) -> Option<u32> {
        c.trait_by_id(id).and_then(|t| t.current_uses)
    }

    #[test]
    fn short_rest_spends_at_most_remaining_dice() {
        let mut c = fighter();
        c.hit_dice.total = 5;
        c.hit_dice.remaining = 3;
        c.hp.max = 50;
        c.hp.current = 10;
        let (mut magic, mut resources) = parts(&c);

        // CON +2; rolls 1, 6, 9
        let mut faces = [1u8, 6, 9].into_iter();
        let result = short_rest(
            &mut c,
            &mut magic,
            &mut resources,
            5,
            |_| faces.next().unwrap_or(1),
            fixed_now(),
        );

        assert_eq!(result, ShortRestResult { hp_restored: 3 + 8 + 11, dice_used: 3 });
        assert_eq!(c.hit_dice.remaining, 0);
        assert_eq!(c.hp.current, 32);
        assert_eq!(c.combat_log[0].kind, CombatLogKind::Rest);
    }

    #[test]
    fn short_rest_healing_is_clamped_to_max() {
        let mut c = fighter();
        c.hp.current = 11;
        let (mut magic, mut resources) = parts(&c);
        let result = short_rest(&mut c, &mut magic, &mut resources, 1, |_| 10, fixed_now());
        assert_eq!(result.hp_restored, 12);
        assert_eq!(c.hp.current, c.hp.max);
    }

    #[test]
    fn short_rest_recovers_short_rest_resources_only() {
        let mut c = with_traits(character(CharacterClass::Warlock));
        let (mut magic, mut resources) = parts(&c);
        magic.use_pact_slot();

        short_rest(&mut c, &mut magic, &mut resources, 0, |_| 1, fixed_now());
        assert_eq!(uses(&c, "short"), Some(1));
        assert_eq!(uses(&c, "long"), Some(0));
        assert_eq!(uses(&c, "dawn"), Some(0));
        assert_eq!(magic.pact_magic_slots.map(|p| p.used), Some(0));
    }

    #[test]
    fn short_rest_keeps_ordinary_slots_spent() {
        let mut c = character(CharacterClass::Wizard);
        let (mut magic, mut resources) = parts(&c);
        magic.use_spell_slot(1);
        short_rest(&mut c, &mut magic, &mut resources, 0, |_| 1, fixed_now());
        assert_eq!(magic.spell_slots[&1].used, 1);
    }

    #[test]
    fn short_rest_is_reproducible_with_the_same_rolls() {
        let run = || {
            let mut c = fighter();
            c.hit_dice.total = 4;
            c.hit_dice.remaining = 4;
            c.hp.max = 60;
            c.hp.current = 1;
            let (mut magic, mut resources) = parts(&c);
            let mut seed = 7u8;
            let roll = move |sides: u8| {
                seed = seed.wrapping_mul(31).wrapping_add(11);
                seed % sides + 1
            };
            short_rest(&mut c, &mut magic, &mut resources, 4, roll, fixed_now())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn long_rest_restores_everything() {
        let mut c = with_traits(character(CharacterClass::Sorcerer));
        c.hit_dice.total = 6;
        c.hit_dice.remaining = 1;
        c.hp.current = 1;
        c.hp.temp = 4;
        c.death_saves.failures = 2;
        c.add_condition(Condition::Poisoned, None, fixed_now());
        c.set_concentration("haste", "Haste", fixed_now());
        let (mut magic, mut resources) = parts(&c);
        magic.use_spell_slot(1);
        magic.spend_sorcery_points(1);

        let result = long_rest(&mut c, &mut magic, &mut resources, fixed_now());

        assert_eq!(c.hp.current, c.hp.max);
        assert_eq!(c.hp.temp, 0);
        assert_eq!(result.hit_dice_restored, 3);
        assert_eq!(c.hit_dice.remaining, 4);
        assert_eq!((c.death_saves.successes, c.death_saves.failures), (0, 0));
        assert!(c.conditions.is_empty());
        assert!(c.concentration.is_none());
        assert_eq!(uses(&c, "short"), Some(1));
        assert_eq!(uses(&c, "long"), Some(1));
        assert_eq!(uses(&c, "dawn"), Some(1));
        assert_eq!(magic.spell_slots[&1].used, 0);
        assert_eq!(magic.sorcery_points.map(|p| p.current), Some(1));
    }

    #[test]
    fn long_rest_restores_at_least_one_die() {
        let mut c = fighter();
        c.hit_dice.remaining = 0;
        let (mut magic, mut resources) = parts(&c);
        long_rest(&mut c, &mut magic, &mut resources, fixed_now());
        assert_eq!(c.hit_dice.remaining, 1);
        assert_eq!(long_rest_hit_dice(1), 1);
        assert_eq!(long_rest_hit_dice(7), 3);
    }

    #[test]
    fn long_rest_refills_class_resources() {
        let mut c = fighter();
        let (mut magic, mut resources) = parts(&c);
        resources.use_resource("second_wind");
        long_rest(&mut c, &mut magic, &mut resources, fixed_now());
        assert_eq!(resources.get("second_wind").map(|r| r.current), Some(1));
    }
}
