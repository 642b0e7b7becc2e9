//! In-play commands: HP, death saves, conditions, spell resources, class
//! resources, rests and experience.

use charsheet_domain::{
    long_rest, short_rest, Ability, Condition, DeathSaveFailure, DeathSaveSuccess, HitDieRoll,
    LevelUpSummary, LongRestResult, ShortRestResult, Skill,
};

use super::CharacterEngine;
use crate::infrastructure::ports::roll_die;

impl CharacterEngine {
    // =========================================================================
    // Hit points
    // =========================================================================

    pub fn apply_damage(&mut self, amount: i32, source: Option<&str>) {
        if amount <= 0 {
            return;
        }
        let now = self.now();
        self.character.apply_damage(amount, source, now);
        self.touch(now);
    }

    /// Heal, returning the HP actually restored.
    pub fn apply_healing(&mut self, amount: i32, source: Option<&str>) -> i32 {
        if amount <= 0 {
            return 0;
        }
        let now = self.now();
        let healed = self.character.apply_healing(amount, source, now);
        self.touch(now);
        healed
    }

    /// Replace temporary HP with `amount`. The old value is overwritten even
    /// when it was higher.
    pub fn set_temp_hp(&mut self, amount: i32) {
        let now = self.now();
        self.character.set_temp_hp(amount, now);
        self.touch(now);
    }

    pub fn set_max_hp(&mut self, amount: i32) -> bool {
        let now = self.now();
        let changed = self.character.set_max_hp(amount, now);
        if changed {
            self.touch(now);
        }
        changed
    }

    pub fn set_current_hp(&mut self, amount: i32) {
        let now = self.now();
        self.character.set_current_hp(amount, now);
        self.touch(now);
    }

    pub fn use_hit_die(&mut self) -> Option<HitDieRoll> {
        let now = self.now();
        let random = self.ports.random.clone();
        let result = self
            .character
            .use_hit_die(|sides| roll_die(random.as_ref(), sides), now);
        if result.is_some() {
            self.touch(now);
        }
        result
    }

    pub fn restore_hit_dice(&mut self, count: u8) {
        let now = self.now();
        self.character.restore_hit_dice(count, now);
        self.touch(now);
    }

    // =========================================================================
    // Death saves
    // =========================================================================

    pub fn add_death_success(&mut self) -> DeathSaveSuccess {
        let now = self.now();
        let outcome = self.character.add_death_success(now);
        if outcome == DeathSaveSuccess::Stable {
            tracing::info!(character_id = %self.character.id, "Character stabilized");
        }
        self.touch(now);
        outcome
    }

    /// Record a failed death save. `Dead` is returned on the third failure
    /// and on every call after it.
    pub fn add_death_failure(&mut self) -> DeathSaveFailure {
        let now = self.now();
        let was_dead = self.character.is_dead();
        let outcome = self.character.add_death_failure(now);
        if outcome == DeathSaveFailure::Dead && !was_dead {
            tracing::warn!(character_id = %self.character.id, "Character died");
        }
        self.touch(now);
        outcome
    }

    pub fn reset_death_saves(&mut self) {
        let now = self.now();
        self.character.reset_death_saves(now);
        self.touch(now);
    }

    pub fn is_dead(&self) -> bool {
        self.character.is_dead()
    }

    // =========================================================================
    // Conditions and concentration
    // =========================================================================

    pub fn add_condition(&mut self, condition: Condition, note: Option<String>) -> bool {
        let now = self.now();
        let added = self.character.add_condition(condition, note, now);
        if added {
            self.touch(now);
        }
        added
    }

    pub fn remove_condition(&mut self, condition: Condition) {
        let now = self.now();
        self.character.remove_condition(condition, now);
        self.touch(now);
    }

    pub fn clear_conditions(&mut self) {
        let now = self.now();
        self.character.clear_conditions(now);
        self.touch(now);
    }

    pub fn set_concentration(&mut self, spell_id: &str, spell_name: &str) {
        let now = self.now();
        self.character.set_concentration(spell_id, spell_name, now);
        self.touch(now);
    }

    pub fn clear_concentration(&mut self) {
        let now = self.now();
        self.character.clear_concentration(now);
        self.touch(now);
    }

    // =========================================================================
    // Traits
    // =========================================================================

    pub fn use_trait_charge(&mut self, trait_id: &str) -> bool {
        let now = self.now();
        let used = self.character.use_trait_charge(trait_id, now);
        if used {
            self.touch(now);
        }
        used
    }

    pub fn restore_trait_charges(&mut self, trait_id: &str) -> bool {
        let now = self.now();
        let restored = self.character.restore_trait_charges(trait_id, now);
        if restored {
            self.touch(now);
        }
        restored
    }

    // =========================================================================
    // Spell resources
    // =========================================================================

    pub fn use_spell_slot(&mut self, level: u8) -> bool {
        let used = self.magic.use_spell_slot(level);
        if used {
            let now = self.now();
            self.touch(now);
        }
        used
    }

    pub fn restore_spell_slot(&mut self, level: u8) {
        self.magic.restore_spell_slot(level);
        let now = self.now();
        self.touch(now);
    }

    pub fn restore_all_spell_slots(&mut self) {
        self.magic.restore_all_spell_slots();
        let now = self.now();
        self.touch(now);
    }

    pub fn use_pact_slot(&mut self) -> bool {
        let used = self.magic.use_pact_slot();
        if used {
            let now = self.now();
            self.touch(now);
        }
        used
    }

    pub fn restore_all_pact_slots(&mut self) {
        self.magic.restore_all_pact_slots();
        let now = self.now();
        self.touch(now);
    }

    pub fn spend_sorcery_points(&mut self, amount: u32) -> bool {
        let spent = self.magic.spend_sorcery_points(amount);
        if spent {
            let now = self.now();
            self.touch(now);
        }
        spent
    }

    pub fn restore_sorcery_points(&mut self) {
        self.magic.restore_sorcery_points();
        let now = self.now();
        self.touch(now);
    }

    /// Flip a spell's prepared state; returns whether it is now prepared.
    pub fn toggle_prepared(&mut self, spell_id: &str) -> bool {
        let prepared = self.magic.toggle_prepared(spell_id);
        self.magic.sync_spell_ids(&mut self.character);
        let now = self.now();
        self.touch(now);
        prepared
    }

    /// Flip a spell's favorite flag; returns whether it is now a favorite.
    pub fn toggle_favorite(&mut self, spell_id: &str) -> bool {
        let favorite = self.magic.toggle_favorite(spell_id);
        let now = self.now();
        self.touch(now);
        favorite
    }

    // =========================================================================
    // Class resources
    // =========================================================================

    pub fn use_class_resource(&mut self, resource_id: &str) -> bool {
        let used = self.resources.use_resource(resource_id);
        if used {
            let now = self.now();
            self.touch(now);
        }
        used
    }

    pub fn use_class_resource_amount(&mut self, resource_id: &str, amount: u32) -> bool {
        let used = self.resources.use_amount(resource_id, amount);
        if used {
            let now = self.now();
            self.touch(now);
        }
        used
    }

    pub fn restore_class_resource(&mut self, resource_id: &str) {
        self.resources.restore(resource_id);
        let now = self.now();
        self.touch(now);
    }

    pub fn restore_all_class_resources(&mut self) {
        self.resources.restore_all();
        let now = self.now();
        self.touch(now);
    }

    // =========================================================================
    // Rests
    // =========================================================================

    pub fn short_rest(&mut self, dice_to_spend: u8) -> ShortRestResult {
        let now = self.now();
        let random = self.ports.random.clone();
        let result = short_rest(
            &mut self.character,
            &mut self.magic,
            &mut self.resources,
            dice_to_spend,
            |sides| roll_die(random.as_ref(), sides),
            now,
        );
        tracing::debug!(
            character_id = %self.character.id,
            dice_used = result.dice_used,
            hp_restored = result.hp_restored,
            "Short rest"
        );
        self.touch(now);
        result
    }

    pub fn long_rest(&mut self) -> LongRestResult {
        let now = self.now();
        let result = long_rest(&mut self.character, &mut self.magic, &mut self.resources, now);
        tracing::debug!(
            character_id = %self.character.id,
            hp_restored = result.hp_restored,
            hit_dice_restored = result.hit_dice_restored,
            "Long rest"
        );
        self.touch(now);
        result
    }

    // =========================================================================
    // Experience
    // =========================================================================

    pub fn add_experience(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        let now = self.now();
        self.character.add_experience(amount, now);
        self.touch(now);
    }

    pub fn remove_experience(&mut self, amount: i64) {
        if amount <= 0 {
            return;
        }
        let now = self.now();
        self.character.remove_experience(amount, now);
        self.touch(now);
    }

    pub fn set_experience(&mut self, amount: i64) {
        let now = self.now();
        self.character.set_experience(amount, now);
        self.touch(now);
    }

    pub fn can_level_up(&self) -> bool {
        self.character.can_level_up()
    }

    pub fn level_up_preview(&self) -> Option<LevelUpSummary> {
        self.character.level_up_preview()
    }

    // =========================================================================
    // Derived reads
    // =========================================================================

    pub fn armor_class(&self) -> i32 {
        self.character.armor_class(&self.equipped)
    }

    pub fn ability_modifier(&self, ability: Ability) -> i32 {
        self.character.ability_modifier(ability)
    }

    pub fn skill_bonus(&self, skill: Skill) -> i32 {
        self.character.skill_bonus(skill)
    }

    pub fn saving_throw_bonus(&self, ability: Ability) -> i32 {
        self.character.saving_throw_bonus(ability)
    }

    pub fn proficiency_bonus(&self) -> i32 {
        self.character.proficiency_bonus()
    }
}
