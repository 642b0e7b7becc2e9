//! Combat and survival commands on a character: HP, temp HP, hit dice,
//! death saves, conditions, concentration and trait charges.
//!
//! Validation failures never error. A command that cannot apply returns
//! `false` or `None` and leaves the character untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Character, CombatLogKind, Concentration, DEATH_SAVE_LIMIT};
use crate::value_objects::{Ability, ActiveCondition, Condition};

/// Outcome of spending one hit die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitDieRoll {
    pub rolled: u8,
    /// `max(1, rolled + CON)`, even when max HP absorbs part of it.
    pub healed: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathSaveSuccess {
    Success,
    /// Third success: saves reset and the character is at 1 HP.
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathSaveFailure {
    Failure,
    /// Third failure. Terminal until the saves are reset.
    Dead,
}

/// HP healed by one hit die: `max(1, roll + CON)`.
pub fn hit_die_healing(roll: u8, con_modifier: i32) -> i32 {
    (i32::from(roll) + con_modifier).max(1)
}

impl Character {
    /// Take damage. Temp HP absorbs first; current HP never drops below 0.
    pub fn apply_damage(&mut self, amount: i32, description: Option<&str>, now: DateTime<Utc>) {
        if amount <= 0 {
            return;
        }

        let absorbed = amount.min(self.hp.temp);
        self.hp.temp -= absorbed;
        self.hp.current = (self.hp.current - (amount - absorbed)).max(0);

        let description = description
            .map(str::to_string)
            .unwrap_or_else(|| format!("Took {} damage", amount));
        self.push_log(CombatLogKind::Damage, amount, description, now);
        self.updated_at = now;
    }

    /// Heal up to max HP and return the HP actually restored.
    ///
    /// Healing a dead character back above 0 HP clears the death saves.
    pub fn apply_healing(&mut self, amount: i32, description: Option<&str>, now: DateTime<Utc>) -> i32 {
        if amount <= 0 {
            return 0;
        }

        let healed = self.heal_clamped(amount);
        let description = description
            .map(str::to_string)
            .unwrap_or_else(|| format!("Healed {} HP", healed));
        self.push_log(CombatLogKind::Healing, healed, description, now);
        self.updated_at = now;
        healed
    }

    pub(crate) fn heal_clamped(&mut self, amount: i32) -> i32 {
        let before = self.hp.current;
        self.hp.current = (self.hp.current + amount.max(0)).min(self.hp.max);
        if self.is_dead() && self.hp.current > 0 {
            self.death_saves = Default::default();
        }
        self.hp.current - before
    }

    /// Set temp HP. Always overwrites the previous value, even a larger one.
    pub fn set_temp_hp(&mut self, amount: i32, now: DateTime<Utc>) {
        self.hp.temp = amount.max(0);
        self.push_log(
            CombatLogKind::TempHp,
            self.hp.temp,
            format!("Temporary HP set to {}", self.hp.temp),
            now,
        );
        self.updated_at = now;
    }

    /// Set max HP (at least 1); current HP is clamped to it.
    pub fn set_max_hp(&mut self, amount: i32, now: DateTime<Utc>) -> bool {
        if amount < 1 {
            return false;
        }
        self.hp.max = amount;
        self.hp.current = self.hp.current.min(amount);
        self.updated_at = now;
        true
    }

    pub fn set_current_hp(&mut self, amount: i32, now: DateTime<Utc>) {
        self.hp.current = amount.clamp(0, self.hp.max);
        self.updated_at = now;
    }

    /// Spend one hit die. `roll` receives the die's side count and returns
    /// the face rolled.
    pub fn use_hit_die(
        &mut self,
        mut roll: impl FnMut(u8) -> u8,
        now: DateTime<Utc>,
    ) -> Option<HitDieRoll> {
        if self.hit_dice.remaining == 0 {
            return None;
        }

        let sides = self.hit_dice.die.sides();
        let rolled = roll(sides).clamp(1, sides);
        let healing = hit_die_healing(rolled, self.ability_modifier(Ability::Con));
        self.heal_clamped(healing);
        self.hit_dice.remaining -= 1;

        self.push_log(
            CombatLogKind::HitDice,
            healing,
            format!("Hit die {}: rolled {}, healed {}", self.hit_dice.die, rolled, healing),
            now,
        );
        self.updated_at = now;
        Some(HitDieRoll { rolled, healed: healing })
    }

    pub fn restore_hit_dice(&mut self, count: u8, now: DateTime<Utc>) {
        self.hit_dice.remaining = self
            .hit_dice
            .remaining
            .saturating_add(count)
            .min(self.hit_dice.total);
        self.updated_at = now;
    }

    pub fn add_death_success(&mut self, now: DateTime<Utc>) -> DeathSaveSuccess {
        let successes = self.death_saves.successes + 1;
        let outcome = if successes >= DEATH_SAVE_LIMIT {
            self.death_saves = Default::default();
            self.hp.current = 1;
            self.push_log(
                CombatLogKind::DeathSave,
                1,
                format!("Stabilized ({} successes)", DEATH_SAVE_LIMIT),
                now,
            );
            DeathSaveSuccess::Stable
        } else {
            self.death_saves.successes = successes;
            self.push_log(
                CombatLogKind::DeathSave,
                1,
                format!("Death save success ({}/{})", successes, DEATH_SAVE_LIMIT),
                now,
            );
            DeathSaveSuccess::Success
        };
        self.updated_at = now;
        outcome
    }

    /// Record a failed death save. Once dead, further failures keep
    /// reporting `Dead` without counting past the limit.
    pub fn add_death_failure(&mut self, now: DateTime<Utc>) -> DeathSaveFailure {
        if self.is_dead() {
            return DeathSaveFailure::Dead;
        }

        self.death_saves.failures += 1;
        let failures = self.death_saves.failures;
        let outcome = if failures >= DEATH_SAVE_LIMIT {
            self.push_log(
                CombatLogKind::DeathSave,
                -1,
                format!("Died ({} failures)", DEATH_SAVE_LIMIT),
                now,
            );
            DeathSaveFailure::Dead
        } else {
            self.push_log(
                CombatLogKind::DeathSave,
                -1,
                format!("Death save failure ({}/{})", failures, DEATH_SAVE_LIMIT),
                now,
            );
            DeathSaveFailure::Failure
        };
        self.updated_at = now;
        outcome
    }

    pub fn reset_death_saves(&mut self, now: DateTime<Utc>) {
        self.death_saves = Default::default();
        self.updated_at = now;
    }

    pub fn is_dead(&self) -> bool {
        self.death_saves.failures >= DEATH_SAVE_LIMIT
    }

    /// Add a condition unless one with the same tag is already active.
    pub fn add_condition(&mut self, condition: Condition, note: Option<String>, now: DateTime<Utc>) -> bool {
        if self.has_condition(condition) {
            return false;
        }
        self.conditions.push(ActiveCondition { condition, note });
        self.updated_at = now;
        true
    }

    pub fn remove_condition(&mut self, condition: Condition, now: DateTime<Utc>) {
        self.conditions.retain(|c| c.condition != condition);
        self.updated_at = now;
    }

    pub fn clear_conditions(&mut self, now: DateTime<Utc>) {
        self.conditions.clear();
        self.updated_at = now;
    }

    /// Start concentrating, replacing any current concentration.
    pub fn set_concentration(
        &mut self,
        spell_id: impl Into<String>,
        spell_name: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.concentration = Some(Concentration {
            spell_id: spell_id.into(),
            spell_name: spell_name.into(),
            started_at: now,
        });
        self.updated_at = now;
    }

    pub fn clear_concentration(&mut self, now: DateTime<Utc>) {
        self.concentration = None;
        self.updated_at = now;
    }

    /// Spend a charge of a limited trait.
    pub fn use_trait_charge(&mut self, trait_id: &str, now: DateTime<Utc>) -> bool {
        let Some(t) = self.traits.iter_mut().find(|t| t.id == trait_id) else {
            return false;
        };
        match (t.max_uses, t.current_uses) {
            (Some(_), Some(current)) if current > 0 => {
                t.current_uses = Some(current - 1);
                self.updated_at = now;
                true
            }
            _ => false,
        }
    }

    pub fn restore_trait_charges(&mut self, trait_id: &str, now: DateTime<Utc>) -> bool {
        let Some(t) = self.traits.iter_mut().find(|t| t.id == trait_id) else {
            return false;
        };
        match (t.max_uses, t.current_uses) {
            (Some(max), current) if current != Some(max) => {
                t.current_uses = Some(max);
                self.updated_at = now;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::test_support::{fighter, fixed_now};
    use crate::entities::{CharacterTrait, RechargeType, TraitOrigin, COMBAT_LOG_MAX};

    #[test]
    fn temp_hp_absorbs_damage_first() {
        let mut c = fighter();
        c.set_temp_hp(5, fixed_now());
        c.apply_damage(3, None, fixed_now());
        assert_eq!((c.hp.current, c.hp.temp), (12, 2));

        c.apply_damage(6, None, fixed_now());
        assert_eq!((c.hp.current, c.hp.temp), (8, 0));
        assert_eq!(c.combat_log[0].kind, CombatLogKind::Damage);
        assert_eq!(c.combat_log[0].amount, 6);
        assert_eq!(c.combat_log[0].hp_after, 8);
    }

    #[test]
    fn damage_clamps_at_zero_and_ignores_non_positive() {
        let mut c = fighter();
        c.apply_damage(0, None, fixed_now());
        c.apply_damage(-4, None, fixed_now());
        assert!(c.combat_log.is_empty());

        c.apply_damage(100, Some("Dragon breath"), fixed_now());
        assert_eq!(c.hp.current, 0);
        assert_eq!(c.combat_log[0].description, "Dragon breath");
    }

    #[test]
    fn healing_is_capped_and_logs_actual_amount() {
        let mut c = fighter();
        c.apply_damage(5, None, fixed_now());
        assert_eq!(c.apply_healing(20, None, fixed_now()), 5);
        assert_eq!(c.hp.current, c.hp.max);
        assert_eq!(c.combat_log[0].amount, 5);
        assert_eq!(c.apply_healing(-3, None, fixed_now()), 0);
    }

    #[test]
    fn temp_hp_overwrites() {
        let mut c = fighter();
        c.set_temp_hp(10, fixed_now());
        c.set_temp_hp(4, fixed_now());
        assert_eq!(c.hp.temp, 4);
        c.set_temp_hp(-2, fixed_now());
        assert_eq!(c.hp.temp, 0);
    }

    #[test]
    fn max_and_current_hp_setters_clamp() {
        let mut c = fighter();
        assert!(!c.set_max_hp(0, fixed_now()));
        assert!(c.set_max_hp(8, fixed_now()));
        assert_eq!((c.hp.max, c.hp.current), (8, 8));
        c.set_current_hp(50, fixed_now());
        assert_eq!(c.hp.current, 8);
        c.set_current_hp(-1, fixed_now());
        assert_eq!(c.hp.current, 0);
    }

    #[test]
    fn hit_die_heals_at_least_one() {
        let mut c = fighter();
        c.apply_damage(10, None, fixed_now());
        let roll = c.use_hit_die(|_| 4, fixed_now()).unwrap();
        assert_eq!(roll, HitDieRoll { rolled: 4, healed: 6 });
        assert_eq!(c.hp.current, 8);
        assert_eq!(c.hit_dice.remaining, 0);
        assert!(c.use_hit_die(|_| 4, fixed_now()).is_none());

        assert_eq!(hit_die_healing(1, -3), 1);
    }

    #[test]
    fn hit_die_at_full_hp_reports_the_full_roll() {
        let mut c = fighter();
        let max = c.hp.max;
        let roll = c.use_hit_die(|_| 6, fixed_now()).unwrap();

        assert_eq!(roll, HitDieRoll { rolled: 6, healed: 8 });
        assert_eq!(c.hp.current, max);
        assert_eq!(c.hit_dice.remaining, 0);
        let entry = c.combat_log.first().unwrap();
        assert_eq!(entry.kind, CombatLogKind::HitDice);
        assert_eq!(entry.amount, 8);
    }

    #[test]
    fn restore_hit_dice_caps_at_total() {
        let mut c = fighter();
        c.hit_dice.total = 5;
        c.hit_dice.remaining = 1;
        c.restore_hit_dice(2, fixed_now());
        assert_eq!(c.hit_dice.remaining, 3);
        c.restore_hit_dice(10, fixed_now());
        assert_eq!(c.hit_dice.remaining, 5);
    }

    #[test]
    fn three_successes_stabilize() {
        let mut c = fighter();
        c.set_current_hp(0, fixed_now());
        c.add_death_failure(fixed_now());
        c.add_death_failure(fixed_now());
        assert_eq!(c.add_death_success(fixed_now()), DeathSaveSuccess::Success);
        assert_eq!(c.add_death_success(fixed_now()), DeathSaveSuccess::Success);
        assert_eq!(c.add_death_success(fixed_now()), DeathSaveSuccess::Stable);
        assert_eq!((c.death_saves.successes, c.death_saves.failures), (0, 0));
        assert_eq!(c.hp.current, 1);
    }

    #[test]
    fn three_failures_are_terminal() {
        let mut c = fighter();
        c.set_current_hp(0, fixed_now());
        assert_eq!(c.add_death_failure(fixed_now()), DeathSaveFailure::Failure);
        assert_eq!(c.add_death_failure(fixed_now()), DeathSaveFailure::Failure);
        assert_eq!(c.add_death_failure(fixed_now()), DeathSaveFailure::Dead);
        assert!(c.is_dead());
        assert_eq!(c.add_death_failure(fixed_now()), DeathSaveFailure::Dead);
        assert_eq!(c.death_saves.failures, 3);

        c.apply_healing(5, None, fixed_now());
        assert!(!c.is_dead());
        assert_eq!(c.death_saves.failures, 0);
    }

    #[test]
    fn conditions_are_unique_by_tag() {
        let mut c = fighter();
        assert!(c.add_condition(Condition::Prone, None, fixed_now()));
        assert!(!c.add_condition(Condition::Prone, Some("again".into()), fixed_now()));
        assert!(c.add_condition(Condition::Poisoned, None, fixed_now()));
        assert_eq!(c.conditions.len(), 2);
        c.remove_condition(Condition::Prone, fixed_now());
        c.remove_condition(Condition::Prone, fixed_now());
        assert_eq!(c.conditions.len(), 1);
        c.clear_conditions(fixed_now());
        assert!(c.conditions.is_empty());
    }

    #[test]
    fn concentration_is_last_write_wins() {
        let mut c = fighter();
        c.set_concentration("bless", "Bless", fixed_now());
        c.set_concentration("haste", "Haste", fixed_now());
        assert_eq!(c.concentration.as_ref().map(|x| x.spell_id.as_str()), Some("haste"));
        c.clear_concentration(fixed_now());
        assert!(c.concentration.is_none());
    }

    #[test]
    fn trait_charges() {
        let mut c = fighter();
        c.traits.push(
            CharacterTrait::passive("lucky", "Lucky", "Reroll", TraitOrigin::Feat)
                .limited(2, RechargeType::LongRest),
        );
        assert!(c.use_trait_charge("lucky", fixed_now()));
        assert!(c.use_trait_charge("lucky", fixed_now()));
        assert!(!c.use_trait_charge("lucky", fixed_now()));
        assert!(c.restore_trait_charges("lucky", fixed_now()));
        assert_eq!(c.trait_by_id("lucky").and_then(|t| t.current_uses), Some(2));
        assert!(!c.restore_trait_charges("lucky", fixed_now()));

        // unlimited traits have nothing to spend
        assert!(!c.use_trait_charge("fighter_second_wind_lv1", fixed_now()));
        assert!(!c.use_trait_charge("missing", fixed_now()));
    }

    #[test]
    fn hp_invariant_holds_over_mixed_sequence() {
        let mut c = fighter();
        let ops: [(i32, i32); 6] = [(7, 0), (0, 3), (20, 0), (0, 50), (3, 2), (1, 0)];
        for (damage, heal) in ops {
            c.apply_damage(damage, None, fixed_now());
            c.apply_healing(heal, None, fixed_now());
            assert!(c.hp.current >= 0 && c.hp.current <= c.hp.max);
            assert!(c.hp.temp >= 0);
        }
        assert!(c.combat_log.len() <= COMBAT_LOG_MAX);
    }
}
