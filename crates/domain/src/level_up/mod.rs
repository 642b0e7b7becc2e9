//! Levelling up: the step plan, the wizard session that drafts the
//! decisions, the atomic commit, and the reset back to level 1.

mod apply;
mod options;
mod plan;
mod reset;
mod wizard;

pub use apply::{apply_level_up, LevelUpOutcome};
pub use options::{hp_base_value, hp_gain, LevelUpOptions};
pub use plan::{LevelUpPlan, LevelUpStep};
pub use reset::reset_to_level_one;
pub use wizard::{LevelUpWizard, WizardBack, WizardTransition};
