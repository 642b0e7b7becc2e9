//! The step plan for one level-up and the per-step validation rules.
//!
//! A plan is built once from the character as it stands and never changes
//! afterwards. The wizard navigates it by index; the commit re-checks every
//! step in it before touching the character.

use std::collections::BTreeSet;

use serde::Serialize;

use super::options::{hp_base_value, LevelUpOptions};
use crate::entities::{Character, MagicState};
use crate::error::DomainError;
use crate::rules::{
    find_metamagic, find_subclass, find_subclass_by_name, level_up_summary, CharacterClass,
    FeatureChoice, LevelUpSummary, SpellLearningInfo, SubclassDefinition, ASI_POINTS, MAX_LEVEL,
};
use crate::value_objects::{Ability, AbilityScores, HitDie, MAX_ABILITY_SCORE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelUpStep {
    Summary,
    Hp,
    Asi,
    Spells,
    Subclass,
    Metamagic,
    Confirm,
}

/// Snapshot of a character's level-up: what the level grants, which steps
/// ask for decisions, and the state the decisions are checked against.
#[derive(Debug, Clone)]
pub struct LevelUpPlan {
    pub summary: LevelUpSummary,
    steps: Vec<LevelUpStep>,
    pub class: CharacterClass,
    pub old_level: u8,
    pub hit_die: HitDie,
    pub abilities: AbilityScores,
    /// Subclass already on the character before this level.
    pub existing_subclass: Option<String>,
    pub known_spell_ids: Vec<String>,
    pub spellbook_ids: Vec<String>,
    pub metamagic_owned: Vec<String>,
}

impl LevelUpPlan {
    /// Plan the next level, or `None` at the level cap.
    pub fn for_character(character: &Character, magic: &MagicState) -> Option<Self> {
        if character.level >= MAX_LEVEL {
            return None;
        }
        let new_level = character.level + 1;
        let summary = level_up_summary(character.class, new_level);

        let existing_subclass = character
            .subclass
            .as_ref()
            .filter(|name| !name.trim().is_empty())
            .cloned();

        let subclass_step = match &existing_subclass {
            None => summary.chooses_subclass,
            Some(name) => find_subclass_by_name(character.class, name)
                .is_some_and(|s| s.has_features_at(new_level)),
        };

        let mut steps = vec![LevelUpStep::Summary, LevelUpStep::Hp];
        if summary.has_asi {
            steps.push(LevelUpStep::Asi);
        }
        if summary
            .spell_learning
            .as_ref()
            .is_some_and(SpellLearningInfo::requires_choices)
        {
            steps.push(LevelUpStep::Spells);
        }
        if subclass_step {
            steps.push(LevelUpStep::Subclass);
        }
        if summary.new_metamagic_choices > 0 {
            steps.push(LevelUpStep::Metamagic);
        }
        steps.push(LevelUpStep::Confirm);

        Some(Self {
            summary,
            steps,
            class: character.class,
            old_level: character.level,
            hit_die: character.hit_dice.die,
            abilities: character.abilities.clone(),
            existing_subclass,
            known_spell_ids: magic.known_spell_ids.clone(),
            spellbook_ids: character.spellbook_ids.clone(),
            metamagic_owned: magic.metamagic_chosen.clone().unwrap_or_default(),
        })
    }

    pub fn new_level(&self) -> u8 {
        self.summary.new_level
    }

    pub fn steps(&self) -> &[LevelUpStep] {
        &self.steps
    }

    /// Whether the spell is already known or in the spellbook.
    pub fn knows_spell(&self, spell_id: &str) -> bool {
        self.known_spell_ids
            .iter()
            .chain(&self.spellbook_ids)
            .any(|id| id == spell_id)
    }

    pub fn includes(&self, step: LevelUpStep) -> bool {
        self.steps.contains(&step)
    }

    /// Spell learning for this level, if the class casts.
    pub fn spell_learning(&self) -> Option<&SpellLearningInfo> {
        self.summary.spell_learning.as_ref()
    }

    /// The subclass in play for this level: newly chosen, else existing.
    pub fn subclass_name<'a>(&'a self, options: &'a LevelUpOptions) -> Option<&'a str> {
        options
            .subclass_chosen
            .as_deref()
            .or(self.existing_subclass.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Catalog entry for the subclass in play, `None` for custom subclasses.
    pub fn subclass_definition(&self, options: &LevelUpOptions) -> Option<&'static SubclassDefinition> {
        let name = self.subclass_name(options)?;
        find_subclass(name)
            .filter(|s| s.class == self.class)
            .or_else(|| find_subclass_by_name(self.class, name))
    }

    /// Choices the subclass step must fill.
    pub fn required_choices(&self, options: &LevelUpOptions) -> Vec<&'static FeatureChoice> {
        self.subclass_definition(options)
            .map(|s| s.choices_at(self.new_level()).collect())
            .unwrap_or_default()
    }

    /// Validate one step of `options`.
    pub fn check_step(&self, step: LevelUpStep, options: &LevelUpOptions) -> Result<(), DomainError> {
        match step {
            LevelUpStep::Summary | LevelUpStep::Confirm => Ok(()),
            LevelUpStep::Hp => hp_base_value(self.hit_die, options.hp_method, options.hp_rolled).map(|_| ()),
            LevelUpStep::Asi => self.check_asi(options),
            LevelUpStep::Spells => self.check_spells(options),
            LevelUpStep::Subclass => self.check_subclass(options),
            LevelUpStep::Metamagic => self.check_metamagic(options),
        }
    }

    /// Validate every planned step and reject decisions for steps that are
    /// not part of this level.
    pub fn validate(&self, options: &LevelUpOptions) -> Result<(), DomainError> {
        for step in &self.steps {
            self.check_step(*step, options)?;
        }

        if !self.includes(LevelUpStep::Asi) && !options.ability_improvements.is_empty() {
            return Err(DomainError::validation("This level grants no ability score improvement"));
        }
        if !self.includes(LevelUpStep::Spells)
            && (!options.cantrips_learned.is_empty()
                || !options.spells_learned.is_empty()
                || !options.spellbook_added.is_empty()
                || options.spell_swapped.is_some())
        {
            return Err(DomainError::validation("This level grants no spell choices"));
        }
        if !self.includes(LevelUpStep::Subclass)
            && (options.subclass_chosen.is_some() || !options.subclass_feature_choices.is_empty())
        {
            return Err(DomainError::validation("This level grants no subclass choice"));
        }
        if !self.includes(LevelUpStep::Metamagic) && !options.metamagic_chosen.is_empty() {
            return Err(DomainError::validation("This level grants no metamagic"));
        }
        Ok(())
    }

    fn check_asi(&self, options: &LevelUpOptions) -> Result<(), DomainError> {
        let mut spent = 0;
        for (ability, points) in &options.ability_improvements {
            if *points < 0 {
                return Err(DomainError::validation(format!("Negative improvement for {}", ability)));
            }
            if self.abilities.total(*ability) + points > MAX_ABILITY_SCORE {
                return Err(DomainError::constraint(format!(
                    "{} would exceed {}",
                    ability, MAX_ABILITY_SCORE
                )));
            }
            spent += points;
        }
        if spent != ASI_POINTS {
            return Err(DomainError::validation(format!(
                "Ability improvement must spend exactly {} points, got {}",
                ASI_POINTS, spent
            )));
        }
        Ok(())
    }

    fn check_spells(&self, options: &LevelUpOptions) -> Result<(), DomainError> {
        let Some(info) = self.spell_learning() else {
            return Ok(());
        };

        exact_unique("cantrips", &options.cantrips_learned, info.new_cantrips)?;
        exact_unique("spells", &options.spells_learned, info.new_spells_known)?;
        exact_unique("spellbook spells", &options.spellbook_added, info.new_spellbook_spells)?;

        if let Some(swap) = &options.spell_swapped {
            if !info.can_swap_spell {
                return Err(DomainError::validation("This level does not allow a spell swap"));
            }
            if swap.forgotten.trim().is_empty() || swap.learned.trim().is_empty() {
                return Err(DomainError::validation("A spell swap needs both spells"));
            }
            if !self.known_spell_ids.contains(&swap.forgotten) {
                return Err(DomainError::not_found("Spell", swap.forgotten.clone()));
            }
        }

        let swapped_in = options.spell_swapped.iter().map(|swap| &swap.learned);
        let mut new_ids = BTreeSet::new();
        for id in options.all_spells_learned().iter().chain(swapped_in) {
            if self.knows_spell(id) {
                return Err(DomainError::validation(format!("Spell already known: {}", id)));
            }
            if !new_ids.insert(id.as_str()) {
                return Err(DomainError::validation(format!("Spell chosen twice: {}", id)));
            }
        }
        Ok(())
    }

    fn check_subclass(&self, options: &LevelUpOptions) -> Result<(), DomainError> {
        if self.existing_subclass.is_some() && options.subclass_chosen.is_some() {
            return Err(DomainError::invalid_state_transition("Subclass is already chosen"));
        }
        if self.subclass_name(options).is_none() {
            return Err(DomainError::validation("A subclass must be chosen"));
        }

        for choice in self.required_choices(options) {
            let selected = options
                .subclass_feature_choices
                .iter()
                .find(|s| s.choice_id == choice.id)
                .map(|s| s.selected_option_ids.as_slice())
                .unwrap_or(&[]);

            let unique: BTreeSet<&String> = selected.iter().collect();
            if selected.len() != choice.required() || unique.len() != selected.len() {
                return Err(DomainError::validation(format!(
                    "{} needs exactly {} selection(s)",
                    choice.name,
                    choice.required()
                )));
            }
            if let Some(bad) = selected.iter().find(|id| choice.option(id).is_none()) {
                return Err(DomainError::not_found("Choice option", bad.clone()));
            }
        }
        Ok(())
    }

    fn check_metamagic(&self, options: &LevelUpOptions) -> Result<(), DomainError> {
        exact_unique("metamagic options", &options.metamagic_chosen, self.summary.new_metamagic_choices)?;
        for id in &options.metamagic_chosen {
            if find_metamagic(id).is_none() {
                return Err(DomainError::not_found("Metamagic", id.clone()));
            }
            if self.metamagic_owned.contains(id) {
                return Err(DomainError::constraint(format!("Metamagic {} is already known", id)));
            }
        }
        Ok(())
    }

    /// Points still unallocated in `options`.
    pub fn asi_remaining(&self, options: &LevelUpOptions) -> i32 {
        ASI_POINTS - options.ability_improvements.values().sum::<i32>()
    }

    /// Whether one more point may go into `ability`.
    pub fn can_add_asi_point(&self, options: &LevelUpOptions, ability: Ability) -> bool {
        let allocated = options.ability_improvements.get(&ability).copied().unwrap_or(0);
        self.asi_remaining(options) > 0 && self.abilities.total(ability) + allocated < MAX_ABILITY_SCORE
    }
}

fn exact_unique(what: &str, ids: &[String], required: u8) -> Result<(), DomainError> {
    let unique: BTreeSet<&str> = ids.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    if ids.len() != usize::from(required) || unique.len() != ids.len() {
        return Err(DomainError::validation(format!(
            "Expected exactly {} distinct {}, got {}",
            required,
            what,
            ids.len()
        )));
    }
    Ok(())
}
