//! The interactive level-up session.
//!
//! The wizard holds a draft separate from the character. Nothing it does
//! touches the character; confirming hands back the finished
//! [`LevelUpOptions`] for [`apply_level_up`](super::apply_level_up).

use super::options::{hp_gain, LevelUpOptions};
use super::plan::{LevelUpPlan, LevelUpStep};
use crate::entities::{Character, HpMethod, MagicState, SpellSwap};
use crate::rules::{find_metamagic, find_subclass, ChoiceKind, FeatureChoiceSelection, LevelUpSummary};
use crate::value_objects::Ability;

/// Result of trying to advance.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardTransition {
    Moved(LevelUpStep),
    /// The confirm step was passed; commit these options.
    Confirmed(Box<LevelUpOptions>),
    /// The current step is incomplete.
    Blocked,
}

/// Result of stepping back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardBack {
    Moved(LevelUpStep),
    /// Backed out of the first step; the draft is abandoned.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct LevelUpWizard {
    plan: LevelUpPlan,
    current: usize,
    draft: LevelUpOptions,
    wants_swap: bool,
    swap_old: Option<String>,
    swap_new: Option<String>,
}

impl LevelUpWizard {
    /// Open a session for the character's next level, or `None` at the cap.
    pub fn open(character: &Character, magic: &MagicState) -> Option<Self> {
        LevelUpPlan::for_character(character, magic).map(|plan| Self {
            plan,
            current: 0,
            draft: LevelUpOptions::default(),
            wants_swap: false,
            swap_old: None,
            swap_new: None,
        })
    }

    pub fn plan(&self) -> &LevelUpPlan {
        &self.plan
    }

    pub fn summary(&self) -> &LevelUpSummary {
        &self.plan.summary
    }

    pub fn steps(&self) -> &[LevelUpStep] {
        self.plan.steps()
    }

    pub fn current_step(&self) -> LevelUpStep {
        self.plan.steps()[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn can_proceed(&self) -> bool {
        self.plan
            .check_step(self.current_step(), &self.build_options())
            .is_ok()
    }

    pub fn next(&mut self) -> WizardTransition {
        if !self.can_proceed() {
            return WizardTransition::Blocked;
        }
        if self.current + 1 >= self.plan.steps().len() {
            return WizardTransition::Confirmed(Box::new(self.build_options()));
        }
        self.current += 1;
        WizardTransition::Moved(self.current_step())
    }

    pub fn back(&mut self) -> WizardBack {
        if self.current == 0 {
            return WizardBack::Cancelled;
        }
        self.current -= 1;
        WizardBack::Moved(self.current_step())
    }

    // HP

    pub fn set_hp_method(&mut self, method: HpMethod) {
        self.draft.hp_method = method;
    }

    /// Roll the hit die for this level. The first roll is kept: calling
    /// again returns it unchanged.
    pub fn roll_hp(&mut self, roll: impl FnOnce(u8) -> u8) -> u8 {
        self.draft.hp_method = HpMethod::Roll;
        if let Some(rolled) = self.draft.hp_rolled {
            return rolled;
        }
        let sides = self.plan.hit_die.sides();
        let rolled = roll(sides).clamp(1, sides);
        self.draft.hp_rolled = Some(rolled);
        rolled
    }

    pub fn hp_rolled(&self) -> Option<u8> {
        self.draft.hp_rolled
    }

    /// HP the level would grant with the current draft, if it is decided.
    pub fn hp_gain_preview(&self) -> Option<i32> {
        hp_gain(
            self.plan.hit_die,
            self.draft.hp_method,
            self.draft.hp_rolled,
            self.plan.abilities.modifier(Ability::Con),
        )
        .ok()
    }

    // ASI

    pub fn asi_remaining(&self) -> i32 {
        self.plan.asi_remaining(&self.draft)
    }

    pub fn asi_allocated(&self, ability: Ability) -> i32 {
        self.draft
            .ability_improvements
            .get(&ability)
            .copied()
            .unwrap_or(0)
    }

    pub fn increment_asi(&mut self, ability: Ability) -> bool {
        if !self.plan.includes(LevelUpStep::Asi) || !self.plan.can_add_asi_point(&self.draft, ability) {
            return false;
        }
        *self.draft.ability_improvements.entry(ability).or_insert(0) += 1;
        true
    }

    pub fn decrement_asi(&mut self, ability: Ability) -> bool {
        match self.draft.ability_improvements.get_mut(&ability) {
            Some(points) if *points > 1 => {
                *points -= 1;
                true
            }
            Some(_) => {
                self.draft.ability_improvements.remove(&ability);
                true
            }
            None => false,
        }
    }

    // Subclass

    /// Pick a catalog subclass of this class. Clears feature choices.
    pub fn select_subclass(&mut self, subclass_id: &str) -> bool {
        if !self.can_choose_subclass() {
            return false;
        }
        match find_subclass(subclass_id).filter(|s| s.class == self.plan.class) {
            Some(definition) => {
                self.draft.subclass_chosen = Some(definition.subclass_id.to_string());
                self.draft.subclass_feature_choices.clear();
                true
            }
            None => false,
        }
    }

    /// Name a subclass outside the catalog. It has no feature choices.
    pub fn set_custom_subclass(&mut self, name: &str) -> bool {
        if !self.can_choose_subclass() {
            return false;
        }
        let name = name.trim();
        self.draft.subclass_chosen = (!name.is_empty()).then(|| name.to_string());
        self.draft.subclass_feature_choices.clear();
        true
    }

    fn can_choose_subclass(&self) -> bool {
        self.plan.includes(LevelUpStep::Subclass) && self.plan.existing_subclass.is_none()
    }

    pub fn selected_options(&self, choice_id: &str) -> &[String] {
        self.draft
            .subclass_feature_choices
            .iter()
            .find(|s| s.choice_id == choice_id)
            .map(|s| s.selected_option_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Select or deselect an option. A single choice swaps to the new
    /// option; a multi choice toggles, up to its count.
    pub fn toggle_feature_choice(&mut self, choice_id: &str, option_id: &str) -> bool {
        let Some(choice) = self
            .plan
            .required_choices(&self.draft)
            .into_iter()
            .find(|c| c.id == choice_id)
        else {
            return false;
        };
        if choice.option(option_id).is_none() {
            return false;
        }

        let choices = &mut self.draft.subclass_feature_choices;
        let index = match choices.iter().position(|s| s.choice_id == choice_id) {
            Some(index) => index,
            None => {
                choices.push(FeatureChoiceSelection {
                    choice_id: choice_id.to_string(),
                    selected_option_ids: Vec::new(),
                });
                choices.len() - 1
            }
        };
        let selected = &mut choices[index].selected_option_ids;

        match choice.kind {
            ChoiceKind::Single => {
                *selected = vec![option_id.to_string()];
                true
            }
            ChoiceKind::Multi => {
                if let Some(pos) = selected.iter().position(|id| id == option_id) {
                    selected.remove(pos);
                    true
                } else if selected.len() < choice.required() {
                    selected.push(option_id.to_string());
                    true
                } else {
                    false
                }
            }
        }
    }

    // Spells

    pub fn toggle_cantrip(&mut self, spell_id: &str) -> bool {
        let limit = self.plan.spell_learning().map_or(0, |i| i.new_cantrips);
        let plan = &self.plan;
        toggle_bounded(&mut self.draft.cantrips_learned, spell_id, limit, |id| plan.knows_spell(id))
    }

    pub fn toggle_spell(&mut self, spell_id: &str) -> bool {
        let limit = self.plan.spell_learning().map_or(0, |i| i.new_spells_known);
        let plan = &self.plan;
        toggle_bounded(&mut self.draft.spells_learned, spell_id, limit, |id| plan.knows_spell(id))
    }

    pub fn toggle_spellbook_spell(&mut self, spell_id: &str) -> bool {
        let limit = self.plan.spell_learning().map_or(0, |i| i.new_spellbook_spells);
        let plan = &self.plan;
        toggle_bounded(&mut self.draft.spellbook_added, spell_id, limit, |id| plan.knows_spell(id))
    }

    /// Opt in or out of trading a known spell. Opting in requires both
    /// sides before the spells step can advance.
    pub fn set_swap(&mut self, wants: bool, forgotten: Option<String>, learned: Option<String>) -> bool {
        let allowed = self.plan.spell_learning().is_some_and(|i| i.can_swap_spell);
        if wants && !allowed {
            return false;
        }
        self.wants_swap = wants;
        self.swap_old = forgotten;
        self.swap_new = learned;
        true
    }

    // Metamagic

    pub fn toggle_metamagic(&mut self, metamagic_id: &str) -> bool {
        if find_metamagic(metamagic_id).is_none()
            || self.plan.metamagic_owned.iter().any(|id| id == metamagic_id)
        {
            return false;
        }
        let limit = self.plan.summary.new_metamagic_choices;
        toggle_bounded(&mut self.draft.metamagic_chosen, metamagic_id, limit, |_| false)
    }

    /// The options as currently drafted.
    pub fn build_options(&self) -> LevelUpOptions {
        let mut options = self.draft.clone();
        if options.hp_method == HpMethod::Fixed {
            options.hp_rolled = None;
        }
        options.spell_swapped = self.wants_swap.then(|| SpellSwap {
            forgotten: self.swap_old.clone().unwrap_or_default(),
            learned: self.swap_new.clone().unwrap_or_default(),
        });
        options
    }
}

fn toggle_bounded(
    selected: &mut Vec<String>,
    id: &str,
    limit: u8,
    excluded: impl Fn(&str) -> bool,
) -> bool {
    if let Some(pos) = selected.iter().position(|s| s == id) {
        selected.remove(pos);
        return true;
    }
    if selected.len() >= usize::from(limit) || excluded(id) {
        return false;
    }
    selected.push(id.to_string());
    true
}
