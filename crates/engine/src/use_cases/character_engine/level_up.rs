//! Level-up and reset.

use charsheet_domain::{
    apply_level_up, reset_to_level_one, LevelUpOptions, LevelUpOutcome, LevelUpWizard,
};

use super::CharacterEngine;
use crate::infrastructure::error::EngineError;

impl CharacterEngine {
    /// Open a wizard session for the next level, or `None` at level 20.
    ///
    /// The session works on its own draft; drop it to cancel.
    pub fn open_level_up(&self) -> Option<LevelUpWizard> {
        LevelUpWizard::open(&self.character, &self.magic)
    }

    /// Commit one level. Invalid options are rejected and nothing changes.
    pub fn commit_level_up(&mut self, options: &LevelUpOptions) -> Result<LevelUpOutcome, EngineError> {
        let now = self.now();
        match apply_level_up(
            &mut self.character,
            &mut self.magic,
            &mut self.resources,
            options,
            now,
        ) {
            Ok(outcome) => {
                tracing::info!(
                    character_id = %self.character.id,
                    level = outcome.summary.new_level,
                    hp_gained = outcome.hp_gained,
                    retroactive_hp = outcome.retroactive_hp,
                    "Level up committed"
                );
                self.touch(now);
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(character_id = %self.character.id, error = %e, "Level up rejected");
                Err(e.into())
            }
        }
    }

    /// Undo every level-up. Returns false at level 1.
    pub fn reset_to_level_one(&mut self) -> bool {
        let now = self.now();
        let reset = reset_to_level_one(&mut self.character, &mut self.magic, &mut self.resources, now);
        if reset {
            tracing::info!(character_id = %self.character.id, "Character reset to level 1");
            self.touch(now);
        }
        reset
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::test_support::*;
    use super::super::CharacterEngine;
    use super::*;
    use crate::infrastructure::clock::FixedRandom;
    use crate::infrastructure::memory_store::MemoryStore;
    use charsheet_domain::{
        Ability, CharacterClass, DomainError, HpMethod, LevelUpStep, WizardTransition, MAX_LEVEL,
    };

    /// Drive the wizard through every step, making the minimal choices.
    fn run_wizard(engine: &CharacterEngine, wizard: &mut LevelUpWizard) -> LevelUpOptions {
        loop {
            match wizard.current_step() {
                LevelUpStep::Hp => {
                    wizard.set_hp_method(HpMethod::Roll);
                    wizard.roll_hp(|sides| engine.roll(sides));
                }
                LevelUpStep::Asi => {
                    wizard.increment_asi(Ability::Con);
                    wizard.increment_asi(Ability::Con);
                }
                LevelUpStep::Subclass => {
                    wizard.select_subclass("champion");
                }
                _ => {}
            }
            match wizard.next() {
                WizardTransition::Moved(_) => {}
                WizardTransition::Confirmed(options) => return *options,
                WizardTransition::Blocked => panic!("blocked at {:?}", wizard.current_step()),
            }
        }
    }

    #[tokio::test]
    async fn wizard_to_commit_to_flush() {
        let store = Arc::new(MemoryStore::new());
        let ports = ports_with(store, Arc::new(no_equipment()), Arc::new(FixedRandom(9)));
        let mut engine = CharacterEngine::create(new_character(CharacterClass::Fighter), ports.clone());
        engine.flush().await.unwrap();

        for expected_level in 2..=4u8 {
            let mut wizard = engine.open_level_up().unwrap();
            let options = run_wizard(&engine, &mut wizard);
            let outcome = engine.commit_level_up(&options).unwrap();
            assert_eq!(outcome.summary.new_level, expected_level);
            assert_eq!(outcome.hp_gained, 11);
        }

        let c = engine.character();
        assert_eq!(c.level, 4);
        assert_eq!(c.subclass.as_deref(), Some("Champion"));
        assert_eq!(c.abilities.constitution.total, 16);
        // 12 at level 1, three levels of 9 + 2, plus 1 retroactive for each of three levels
        assert_eq!(c.hp.max, 12 + 33 + 3);
        assert_eq!(c.level_history.len(), 4);
        assert!(engine.is_dirty());

        let id = c.id;
        engine.flush().await.unwrap();
        let loaded = CharacterEngine::load(id, ports).await.unwrap();
        assert_eq!(loaded.character().level, 4);
        assert_eq!(loaded.class_resources(), engine.class_resources());
    }

    #[tokio::test]
    async fn rejected_commit_leaves_engine_clean() {
        let (_, ports) = memory_ports(1);
        let mut character = new_character(CharacterClass::Fighter);
        character.level = 3;
        let mut engine = CharacterEngine::create(character, ports);
        engine.flush().await.unwrap();

        let err = engine.commit_level_up(&LevelUpOptions::fixed()).unwrap_err();
        assert!(matches!(err, EngineError::Domain(DomainError::Validation(_))));
        assert_eq!(engine.character().level, 3);
        assert!(!engine.is_dirty());
    }

    #[test]
    fn no_wizard_at_max_level() {
        let (_, ports) = memory_ports(1);
        let mut character = new_character(CharacterClass::Rogue);
        character.level = MAX_LEVEL;
        let engine = CharacterEngine::create(character, ports);
        assert!(engine.open_level_up().is_none());
    }

    #[tokio::test]
    async fn reset_after_levels() {
        let (_, ports) = memory_ports(1);
        let mut engine = CharacterEngine::create(new_character(CharacterClass::Fighter), ports);
        assert!(!engine.reset_to_level_one());

        engine.commit_level_up(&LevelUpOptions::fixed()).unwrap();
        engine.flush().await.unwrap();

        assert!(engine.reset_to_level_one());
        assert!(engine.is_dirty());
        assert_eq!(engine.character().level, 1);
        assert_eq!(engine.character().hp.max, 12);
        assert!(engine.class_resources().get("action_surge").is_none());
    }
}
