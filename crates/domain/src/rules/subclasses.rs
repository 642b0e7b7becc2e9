//! Built-in subclass catalog.
//!
//! One SRD subclass per class. Each subclass lists the features it grants by
//! level; some features ask the player to pick among options.

use serde::{Deserialize, Serialize};

use super::classes::CharacterClass;

/// Whether a choice takes one option or several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceKind {
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureChoice {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ChoiceKind,
    /// Selections required for a multi choice. Ignored for single choices.
    pub count: u8,
    pub options: &'static [ChoiceOption],
}

impl FeatureChoice {
    /// Exact number of options that must be picked.
    pub fn required(&self) -> usize {
        match self.kind {
            ChoiceKind::Single => 1,
            ChoiceKind::Multi => usize::from(self.count),
        }
    }

    pub fn option(&self, id: &str) -> Option<&'static ChoiceOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubclassFeature {
    pub name: &'static str,
    pub description: &'static str,
    pub choices: &'static [FeatureChoice],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubclassLevel {
    pub level: u8,
    pub features: &'static [SubclassFeature],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubclassDefinition {
    pub subclass_id: &'static str,
    pub class: CharacterClass,
    pub name: &'static str,
    pub levels: &'static [SubclassLevel],
}

impl SubclassDefinition {
    /// Features granted at exactly `level` (empty if none).
    pub fn features_at(&self, level: u8) -> &'static [SubclassFeature] {
        self.levels
            .iter()
            .find(|l| l.level == level)
            .map(|l| l.features)
            .unwrap_or(&[])
    }

    pub fn has_features_at(&self, level: u8) -> bool {
        !self.features_at(level).is_empty()
    }

    /// Every choice attached to a feature at `level`.
    pub fn choices_at(&self, level: u8) -> impl Iterator<Item = &'static FeatureChoice> {
        self.features_at(level).iter().flat_map(|f| f.choices.iter())
    }
}

/// Options picked for one feature choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureChoiceSelection {
    pub choice_id: String,
    pub selected_option_ids: Vec<String>,
}

/// Subclasses available to a class.
pub fn subclasses_for_class(class: CharacterClass) -> impl Iterator<Item = &'static SubclassDefinition> {
    SUBCLASSES.iter().filter(move |s| s.class == class)
}

pub fn find_subclass(subclass_id: &str) -> Option<&'static SubclassDefinition> {
    SUBCLASSES.iter().find(|s| s.subclass_id == subclass_id)
}

/// Resolve a stored subclass name (display name or id) for a class.
///
/// Custom subclasses have no catalog entry and resolve to `None`.
pub fn find_subclass_by_name(class: CharacterClass, name: &str) -> Option<&'static SubclassDefinition> {
    let wanted = name.trim();
    subclasses_for_class(class)
        .find(|s| s.name.eq_ignore_ascii_case(wanted) || s.subclass_id == wanted)
}

/// Feature description with the chosen option names appended.
pub fn render_feature_description(
    feature: &SubclassFeature,
    selections: &[FeatureChoiceSelection],
) -> String {
    let mut description = feature.description.to_string();
    for choice in feature.choices {
        let Some(selection) = selections.iter().find(|s| s.choice_id == choice.id) else {
            continue;
        };
        if selection.selected_option_ids.is_empty() {
            continue;
        }
        let chosen: Vec<String> = selection
            .selected_option_ids
            .iter()
            .map(|id| match choice.option(id) {
                Some(option) => format!("{}: {}", option.name, option.description),
                None => id.clone(),
            })
            .collect();
        description.push_str(&format!("\n\nChosen ({}):\n{}", choice.name, chosen.join("\n")));
    }
    description
}

const fn feature(name: &'static str, description: &'static str) -> SubclassFeature {
    SubclassFeature {
        name,
        description,
        choices: &[],
    }
}

const fn option(id: &'static str, name: &'static str, description: &'static str) -> ChoiceOption {
    ChoiceOption { id, name, description }
}

pub static SUBCLASSES: &[SubclassDefinition] = &[
    SubclassDefinition {
        subclass_id: "berserker",
        class: CharacterClass::Barbarian,
        name: "Path of the Berserker",
        levels: &[
            SubclassLevel {
                level: 3,
                features: &[feature("Frenzy", "While raging, make a melee attack as a bonus action each turn; gain exhaustion when the rage ends.")],
            },
            SubclassLevel {
                level: 6,
                features: &[feature("Mindless Rage", "You can't be charmed or frightened while raging.")],
            },
            SubclassLevel {
                level: 10,
                features: &[feature("Intimidating Presence", "Use your action to frighten a creature you can see.")],
            },
            SubclassLevel {
                level: 14,
                features: &[feature("Retaliation", "Make a melee attack as a reaction when damaged by a nearby creature.")],
            },
        ],
    },
    SubclassDefinition {
        subclass_id: "lore",
        class: CharacterClass::Bard,
        name: "College of Lore",
        levels: &[
            SubclassLevel {
                level: 3,
                features: &[
                    SubclassFeature {
                        name: "Bonus Proficiencies",
                        description: "Gain proficiency with three skills of your choice.",
                        choices: &[FeatureChoice {
                            id: "lore_bonus_skills",
                            name: "Bonus skills",
                            kind: ChoiceKind::Multi,
                            count: 3,
                            options: &[
                                option("arcana", "Arcana", "Recall lore about spells and magic."),
                                option("history", "History", "Recall historical events and people."),
                                option("insight", "Insight", "Read intentions and detect lies."),
                                option("investigation", "Investigation", "Search for clues and make deductions."),
                                option("medicine", "Medicine", "Stabilize the dying and diagnose illness."),
                                option("nature", "Nature", "Recall lore about terrain, plants and animals."),
                                option("perception", "Perception", "Spot, hear or otherwise notice things."),
                                option("persuasion", "Persuasion", "Influence others with tact and grace."),
                                option("religion", "Religion", "Recall lore about deities and rites."),
                                option("stealth", "Stealth", "Move without being noticed."),
                            ],
                        }],
                    },
                    feature("Cutting Words", "Spend Bardic Inspiration to reduce an enemy's roll."),
                ],
            },
            SubclassLevel {
                level: 6,
                features: &[feature("Additional Magical Secrets", "Learn two spells from any class.")],
            },
            SubclassLevel {
                level: 14,
                features: &[feature("Peerless Skill", "Add a Bardic Inspiration die to your own ability check.")],
            },
        ],
    },
    SubclassDefinition {
        subclass_id: "life",
        class: CharacterClass::Cleric,
        name: "Life Domain",
        levels: &[
            SubclassLevel {
                level: 1,
                features: &[
                    feature("Bonus Proficiency", "Proficiency with heavy armor."),
                    feature("Disciple of Life", "Healing spells restore extra HP equal to 2 + the spell's level."),
                ],
            },
            SubclassLevel {
                level: 2,
                features: &[feature("Channel Divinity: Preserve Life", "Distribute HP equal to five times your level among nearby creatures.")],
            },
            SubclassLevel {
                level: 6,
                features: &[feature("Blessed Healer", "Healing others also heals you for 2 + the spell's level.")],
            },
            SubclassLevel {
                level: 8,
                features: &[feature("Divine Strike", "Weapon hits deal an extra 1d8 radiant damage once per turn.")],
            },
            SubclassLevel {
                level: 17,
                features: &[feature("Supreme Healing", "Healing dice always roll their maximum.")],
            },
        ],
    },
    SubclassDefinition {
        subclass_id: "land",
        class: CharacterClass::Druid,
        name: "Circle of the Land",
        levels: &[
            SubclassLevel {
                level: 2,
                features: &[
                    SubclassFeature {
                        name: "Circle Spells",
                        description: "Your mystical connection to the land grants additional prepared spells.",
                        choices: &[FeatureChoice {
                            id: "land_terrain",
                            name: "Terrain",
                            kind: ChoiceKind::Single,
                            count: 1,
                            options: &[
                                option("arctic", "Arctic", "Hold person, cone of cold and other frost magic."),
                                option("coast", "Coast", "Mirror image, water breathing and tidal magic."),
                                option("desert", "Desert", "Blur, create food and water and heat magic."),
                                option("forest", "Forest", "Barkskin, spider climb and woodland magic."),
                                option("grassland", "Grassland", "Invisibility, haste and plains magic."),
                                option("mountain", "Mountain", "Spider climb, lightning bolt and stone magic."),
                                option("swamp", "Swamp", "Darkness, stinking cloud and bog magic."),
                                option("underdark", "Underdark", "Web, gaseous form and deep magic."),
                            ],
                        }],
                    },
                    feature("Natural Recovery", "Recover spell slots during a short rest once per day."),
                ],
            },
            SubclassLevel {
                level: 6,
                features: &[feature("Land's Stride", "Move through nonmagical difficult terrain freely.")],
            },
            SubclassLevel {
                level: 10,
                features: &[feature("Nature's Ward", "Immune to poison and disease; fey and elementals can't charm or frighten you.")],
            },
            SubclassLevel {
                level: 14,
                features: &[feature("Nature's Sanctuary", "Beasts and plants must save to attack you.")],
            },
        ],
    },
    SubclassDefinition {
        subclass_id: "champion",
        class: CharacterClass::Fighter,
        name: "Champion",
        levels: &[
            SubclassLevel {
                level: 3,
                features: &[feature("Improved Critical", "Weapon attacks score a critical hit on 19 or 20.")],
            },
            SubclassLevel {
                level: 7,
                features: &[feature("Remarkable Athlete", "Add half proficiency to STR, DEX and CON checks that lack it.")],
            },
            SubclassLevel {
                level: 10,
                features: &[SubclassFeature {
                    name: "Additional Fighting Style",
                    description: "Choose a second fighting style.",
                    choices: &[FeatureChoice {
                        id: "champion_fighting_style",
                        name: "Fighting style",
                        kind: ChoiceKind::Single,
                        count: 1,
                        options: &[
                            option("archery", "Archery", "+2 to attack rolls with ranged weapons."),
                            option("defense", "Defense", "+1 AC while wearing armor."),
                            option("dueling", "Dueling", "+2 damage with a one-handed melee weapon."),
                            option("great_weapon_fighting", "Great Weapon Fighting", "Reroll 1s and 2s on two-handed weapon damage."),
                            option("protection", "Protection", "Impose disadvantage on attacks against an adjacent ally."),
                            option("two_weapon_fighting", "Two-Weapon Fighting", "Add your modifier to off-hand damage."),
                        ],
                    }],
                }],
            },
            SubclassLevel {
                level: 15,
                features: &[feature("Superior Critical", "Weapon attacks score a critical hit on 18 to 20.")],
            },
            SubclassLevel {
                level: 18,
                features: &[feature("Survivor", "Regain 5 + CON HP each turn while below half HP.")],
            },
        ],
    },
    SubclassDefinition {
        subclass_id: "open_hand",
        class: CharacterClass::Monk,
        name: "Way of the Open Hand",
        levels: &[
            SubclassLevel {
                level: 3,
                features: &[feature("Open Hand Technique", "Flurry of Blows can knock prone, push or deny reactions.")],
            },
            SubclassLevel {
                level: 6,
                features: &[feature("Wholeness of Body", "Regain HP equal to three times your level once per long rest.")],
            },
            SubclassLevel {
                level: 11,
                features: &[feature("Tranquility", "Gain the effect of sanctuary after each long rest.")],
            },
            SubclassLevel {
                level: 17,
                features: &[feature("Quivering Palm", "Set up lethal vibrations in a creature you strike.")],
            },
        ],
    },
    SubclassDefinition {
        subclass_id: "devotion",
        class: CharacterClass::Paladin,
        name: "Oath of Devotion",
        levels: &[
            SubclassLevel {
                level: 3,
                features: &[
                    feature("Channel Divinity: Sacred Weapon", "Add CHA to attack rolls with a weapon for one minute."),
                    feature("Channel Divinity: Turn the Unholy", "Turn fiends and undead."),
                ],
            },
            SubclassLevel {
                level: 7,
                features: &[feature("Aura of Devotion", "You and nearby allies can't be charmed while you are conscious.")],
            },
            SubclassLevel {
                level: 15,
                features: &[feature("Purity of Spirit", "You are always under the effects of protection from evil and good.")],
            },
            SubclassLevel {
                level: 20,
                features: &[feature("Holy Nimbus", "Emanate an aura of sunlight that damages enemies.")],
            },
        ],
    },
    SubclassDefinition {
        subclass_id: "hunter",
        class: CharacterClass::Ranger,
        name: "Hunter",
        levels: &[
            SubclassLevel {
                level: 3,
                features: &[SubclassFeature {
                    name: "Hunter's Prey",
                    description: "Gain a feature that helps you bring down your quarry.",
                    choices: &[FeatureChoice {
                        id: "hunter_prey",
                        name: "Hunter's prey",
                        kind: ChoiceKind::Single,
                        count: 1,
                        options: &[
                            option("colossus_slayer", "Colossus Slayer", "Extra 1d8 damage against wounded targets once per turn."),
                            option("giant_killer", "Giant Killer", "React to attack a Large or larger creature that attacks you."),
                            option("horde_breaker", "Horde Breaker", "Attack a second creature next to your target."),
                        ],
                    }],
                }],
            },
            SubclassLevel {
                level: 7,
                features: &[SubclassFeature {
                    name: "Defensive Tactics",
                    description: "Gain a feature that protects you from your foes.",
                    choices: &[FeatureChoice {
                        id: "hunter_defensive_tactics",
                        name: "Defensive tactics",
                        kind: ChoiceKind::Single,
                        count: 1,
                        options: &[
                            option("escape_the_horde", "Escape the Horde", "Opportunity attacks against you have disadvantage."),
                            option("multiattack_defense", "Multiattack Defense", "+4 AC against later attacks from a creature that hit you."),
                            option("steel_will", "Steel Will", "Advantage on saves against being frightened."),
                        ],
                    }],
                }],
            },
            SubclassLevel {
                level: 11,
                features: &[SubclassFeature {
                    name: "Multiattack",
                    description: "Gain a feature for fighting many foes.",
                    choices: &[FeatureChoice {
                        id: "hunter_multiattack",
                        name: "Multiattack",
                        kind: ChoiceKind::Single,
                        count: 1,
                        options: &[
                            option("volley", "Volley", "Ranged attack against every creature in a 10-foot radius."),
                            option("whirlwind_attack", "Whirlwind Attack", "Melee attack against every creature within 5 feet."),
                        ],
                    }],
                }],
            },
            SubclassLevel {
                level: 15,
                features: &[SubclassFeature {
                    name: "Superior Hunter's Defense",
                    description: "Gain a feature that shields you from harm.",
                    choices: &[FeatureChoice {
                        id: "hunter_superior_defense",
                        name: "Superior defense",
                        kind: ChoiceKind::Single,
                        count: 1,
                        options: &[
                            option("evasion", "Evasion", "Take no damage on a successful DEX save for half."),
                            option("stand_against_the_tide", "Stand Against the Tide", "Redirect a missed melee attack to another creature."),
                            option("uncanny_dodge", "Uncanny Dodge", "Halve the damage of an attack you can see."),
                        ],
                    }],
                }],
            },
        ],
    },
    SubclassDefinition {
        subclass_id: "thief",
        class: CharacterClass::Rogue,
        name: "Thief",
        levels: &[
            SubclassLevel {
                level: 3,
                features: &[
                    feature("Fast Hands", "Use Cunning Action for sleight of hand, thieves' tools or Use an Object."),
                    feature("Second-Story Work", "Climb at full speed and jump farther."),
                ],
            },
            SubclassLevel {
                level: 9,
                features: &[feature("Supreme Sneak", "Advantage on Stealth when moving at half speed.")],
            },
            SubclassLevel {
                level: 13,
                features: &[feature("Use Magic Device", "Ignore class, race and level requirements on magic items.")],
            },
            SubclassLevel {
                level: 17,
                features: &[feature("Thief's Reflexes", "Take two turns in the first round of combat.")],
            },
        ],
    },
    SubclassDefinition {
        subclass_id: "draconic",
        class: CharacterClass::Sorcerer,
        name: "Draconic Bloodline",
        levels: &[
            SubclassLevel {
                level: 1,
                features: &[
                    SubclassFeature {
                        name: "Dragon Ancestor",
                        description: "Choose the type of dragon in your bloodline.",
                        choices: &[FeatureChoice {
                            id: "draconic_ancestry",
                            name: "Dragon ancestor",
                            kind: ChoiceKind::Single,
                            count: 1,
                            options: &[
                                option("black", "Black", "Acid damage."),
                                option("blue", "Blue", "Lightning damage."),
                                option("brass", "Brass", "Fire damage."),
                                option("bronze", "Bronze", "Lightning damage."),
                                option("copper", "Copper", "Acid damage."),
                                option("gold", "Gold", "Fire damage."),
                                option("green", "Green", "Poison damage."),
                                option("red", "Red", "Fire damage."),
                                option("silver", "Silver", "Cold damage."),
                                option("white", "White", "Cold damage."),
                            ],
                        }],
                    },
                    feature("Draconic Resilience", "Max HP rises by 1 per sorcerer level; unarmored AC is 13 + DEX."),
                ],
            },
            SubclassLevel {
                level: 6,
                features: &[feature("Elemental Affinity", "Add CHA to damage of your ancestry's type.")],
            },
            SubclassLevel {
                level: 14,
                features: &[feature("Dragon Wings", "Sprout wings and gain a flying speed.")],
            },
            SubclassLevel {
                level: 18,
                features: &[feature("Draconic Presence", "Spend 5 sorcery points to exude an aura of awe or fear.")],
            },
        ],
    },
    SubclassDefinition {
        subclass_id: "fiend",
        class: CharacterClass::Warlock,
        name: "The Fiend",
        levels: &[
            SubclassLevel {
                level: 1,
                features: &[feature("Dark One's Blessing", "Gain temporary HP when you reduce a hostile creature to 0 HP.")],
            },
            SubclassLevel {
                level: 6,
                features: &[feature("Dark One's Own Luck", "Add a d10 to an ability check or saving throw.")],
            },
            SubclassLevel {
                level: 10,
                features: &[feature("Fiendish Resilience", "Choose a damage type to resist after each rest.")],
            },
            SubclassLevel {
                level: 14,
                features: &[feature("Hurl Through Hell", "Send a creature you hit through the lower planes.")],
            },
        ],
    },
    SubclassDefinition {
        subclass_id: "evocation",
        class: CharacterClass::Wizard,
        name: "School of Evocation",
        levels: &[
            SubclassLevel {
                level: 2,
                features: &[
                    feature("Evocation Savant", "Copying evocation spells costs half the gold and time."),
                    feature("Sculpt Spells", "Protect allies from your evocation spells."),
                ],
            },
            SubclassLevel {
                level: 6,
                features: &[feature("Potent Cantrip", "Targets that save against your cantrips still take half damage.")],
            },
            SubclassLevel {
                level: 10,
                features: &[feature("Empowered Evocation", "Add INT to the damage of evocation spells.")],
            },
            SubclassLevel {
                level: 14,
                features: &[feature("Overchannel", "Deal maximum damage with a low-level spell at a cost.")],
            },
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_class_has_a_subclass() {
        for class in CharacterClass::ALL {
            assert_eq!(subclasses_for_class(class).count(), 1, "{}", class);
        }
    }

    #[test]
    fn resolve_by_name_or_id() {
        let champion = find_subclass_by_name(CharacterClass::Fighter, "champion").unwrap();
        assert_eq!(champion.subclass_id, "champion");
        assert_eq!(
            find_subclass_by_name(CharacterClass::Bard, "College of Lore").map(|s| s.subclass_id),
            Some("lore")
        );
        assert!(find_subclass_by_name(CharacterClass::Fighter, "College of Lore").is_none());
        assert!(find_subclass_by_name(CharacterClass::Fighter, "Rune Knight").is_none());
    }

    #[test]
    fn champion_choice_at_ten() {
        let champion = find_subclass("champion").unwrap();
        assert!(champion.has_features_at(10));
        assert!(!champion.has_features_at(4));
        let choices: Vec<_> = champion.choices_at(10).collect();
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].required(), 1);
    }

    #[test]
    fn lore_multi_choice_needs_three() {
        let lore = find_subclass("lore").unwrap();
        let choice = lore.choices_at(3).next().unwrap();
        assert_eq!(choice.kind, ChoiceKind::Multi);
        assert_eq!(choice.required(), 3);
    }

    #[test]
    fn rendered_description_lists_chosen_options() {
        let hunter = find_subclass("hunter").unwrap();
        let feature = &hunter.features_at(3)[0];
        let rendered = render_feature_description(
            feature,
            &[FeatureChoiceSelection {
                choice_id: "hunter_prey".into(),
                selected_option_ids: vec!["colossus_slayer".into()],
            }],
        );
        assert!(rendered.starts_with(feature.description));
        assert!(rendered.contains("Colossus Slayer"));

        assert_eq!(render_feature_description(feature, &[]), feature.description);
    }
}
