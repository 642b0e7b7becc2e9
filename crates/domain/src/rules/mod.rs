//! Rules tables: pure lookups keyed by class and level.

pub mod class_features;
pub mod class_resources;
pub mod classes;
pub mod leveling;
pub mod metamagic;
pub mod spell_tables;
pub mod subclasses;

pub use class_features::{features_for_level, ClassFeature};
pub use class_resources::{
    rage_uses, resources_for_level, ClassResource, ResourceRecovery, UNLIMITED_RESOURCE,
};
pub use classes::{CasterType, CharacterClass, ClassData, SpellPreparation};
pub use leveling::{
    asi_levels, can_level_up, is_asi_level, is_subclass_level, level_for_xp, level_up_summary,
    new_metamagic_choices, proficiency_bonus, spell_learning_info, xp_for_level,
    xp_for_next_level, xp_progress, LevelUpSummary, PreparationType, SpellLearningInfo,
    ASI_POINTS, MAX_LEVEL, MAX_XP, WIZARD_SPELLBOOK_SPELLS_PER_LEVEL,
};
pub use metamagic::{find_metamagic, MetamagicOption, METAMAGIC_OPTIONS};
pub use spell_tables::{
    cantrips_known, max_spell_level, pact_magic_slots, slots_for_caster, spell_slots,
    spells_known, PactSlotTable,
};
pub use subclasses::{
    find_subclass, find_subclass_by_name, render_feature_description, subclasses_for_class,
    ChoiceKind, ChoiceOption, FeatureChoice, FeatureChoiceSelection, SubclassDefinition,
    SubclassFeature, SubclassLevel, SUBCLASSES,
};
