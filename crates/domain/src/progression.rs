//! Experience commands and level-up gating.

use chrono::{DateTime, Utc};

use crate::entities::Character;
use crate::rules::{self, level_up_summary, LevelUpSummary, MAX_LEVEL, MAX_XP};

impl Character {
    /// Add experience. Non-positive amounts are ignored.
    pub fn add_experience(&mut self, amount: i64, now: DateTime<Utc>) {
        if amount <= 0 {
            return;
        }
        self.set_experience(i64::from(self.experience).saturating_add(amount), now);
    }

    /// Remove experience, never going below 0. Non-positive amounts are
    /// ignored.
    pub fn remove_experience(&mut self, amount: i64, now: DateTime<Utc>) {
        if amount <= 0 {
            return;
        }
        self.set_experience(i64::from(self.experience).saturating_sub(amount), now);
    }

    /// Set experience, clamped into `0..=MAX_XP`.
    pub fn set_experience(&mut self, amount: i64, now: DateTime<Utc>) {
        self.experience = u32::try_from(amount.clamp(0, i64::from(MAX_XP))).unwrap_or(MAX_XP);
        self.updated_at = now;
    }

    pub fn can_level_up(&self) -> bool {
        rules::can_level_up(self.experience, self.level)
    }

    /// What the next level grants, or `None` at the level cap.
    pub fn level_up_preview(&self) -> Option<LevelUpSummary> {
        (self.level < MAX_LEVEL).then(|| level_up_summary(self.class, self.level + 1))
    }

    /// Fraction of the way to the next level.
    pub fn xp_progress(&self) -> f64 {
        rules::xp_progress(self.experience, self.level)
    }

    pub fn xp_for_next_level(&self) -> Option<u32> {
        rules::xp_for_next_level(self.level)
    }
}
