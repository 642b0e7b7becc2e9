//! Class features gained at each level.
//!
//! A compact catalog: names and one-line descriptions. Entries flagged as
//! subclass features are placeholders for whatever the chosen subclass
//! grants at that level.

use serde::{Deserialize, Serialize};

use super::classes::CharacterClass;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFeature {
    pub name: String,
    pub description: String,
    pub level: u8,
    /// Granted through the subclass rather than the base class.
    pub is_subclass: bool,
}

type FeatureRow = (u8, &'static str, &'static str, bool);

/// Features a class gains on reaching `level`.
pub fn features_for_level(class: CharacterClass, level: u8) -> Vec<ClassFeature> {
    feature_table(class)
        .iter()
        .filter(|(l, ..)| *l == level)
        .map(|&(level, name, description, is_subclass)| ClassFeature {
            name: name.to_string(),
            description: description.to_string(),
            level,
            is_subclass,
        })
        .collect()
}

fn feature_table(class: CharacterClass) -> &'static [FeatureRow] {
    match class {
        CharacterClass::Barbarian => BARBARIAN,
        CharacterClass::Bard => BARD,
        CharacterClass::Cleric => CLERIC,
        CharacterClass::Druid => DRUID,
        CharacterClass::Fighter => FIGHTER,
        CharacterClass::Monk => MONK,
        CharacterClass::Paladin => PALADIN,
        CharacterClass::Ranger => RANGER,
        CharacterClass::Rogue => ROGUE,
        CharacterClass::Sorcerer => SORCERER,
        CharacterClass::Warlock => WARLOCK,
        CharacterClass::Wizard => WIZARD,
    }
}

const BARBARIAN: &[FeatureRow] = &[
    (1, "Rage", "Enter a rage as a bonus action for extra melee damage and resistance.", false),
    (1, "Unarmored Defense", "Without armor, AC equals 10 + DEX + CON.", false),
    (2, "Reckless Attack", "Attack with advantage at the cost of granting advantage to foes.", false),
    (2, "Danger Sense", "Advantage on DEX saves against effects you can see.", false),
    (3, "Primal Path", "Choose your primal path.", true),
    (5, "Extra Attack", "Attack twice when taking the Attack action.", false),
    (5, "Fast Movement", "Speed increases by 10 feet without heavy armor.", false),
    (6, "Path Feature", "Gain a feature from your primal path.", true),
    (7, "Feral Instinct", "Advantage on initiative rolls.", false),
    (9, "Brutal Critical", "Roll one extra weapon die on a melee critical hit.", false),
    (10, "Path Feature", "Gain a feature from your primal path.", true),
    (11, "Relentless Rage", "Drop to 1 HP instead of 0 on a successful CON save while raging.", false),
    (13, "Brutal Critical (2 dice)", "Roll two extra weapon dice on a melee critical hit.", false),
    (14, "Path Feature", "Gain a feature from your primal path.", true),
    (15, "Persistent Rage", "Your rage ends early only if you fall unconscious or choose to end it.", false),
    (17, "Brutal Critical (3 dice)", "Roll three extra weapon dice on a melee critical hit.", false),
    (18, "Indomitable Might", "A STR check total lower than your STR score uses the score instead.", false),
    (20, "Primal Champion", "STR and CON increase by 4, to a maximum of 24.", false),
];

const BARD: &[FeatureRow] = &[
    (1, "Spellcasting", "Cast bard spells using CHA.", false),
    (1, "Bardic Inspiration", "Grant an ally a d6 to add to one roll.", false),
    (2, "Jack of All Trades", "Add half proficiency to checks you are not proficient in.", false),
    (2, "Song of Rest", "Allies regain an extra d6 HP when spending hit dice on a short rest.", false),
    (3, "Bard College", "Choose your bard college.", true),
    (3, "Expertise", "Double proficiency for two skills.", false),
    (5, "Font of Inspiration", "Bardic Inspiration recharges on a short rest.", false),
    (6, "Countercharm", "Allies gain advantage on saves against fear and charm.", false),
    (6, "College Feature", "Gain a feature from your bard college.", true),
    (10, "Magical Secrets", "Learn two spells from any class.", false),
    (14, "College Feature", "Gain a feature from your bard college.", true),
    (20, "Superior Inspiration", "Regain one Bardic Inspiration when rolling initiative with none left.", false),
];

const CLERIC: &[FeatureRow] = &[
    (1, "Spellcasting", "Cast cleric spells using WIS.", false),
    (1, "Divine Domain", "Choose your divine domain.", true),
    (2, "Channel Divinity", "Turn Undead and a domain effect, once per rest.", false),
    (5, "Destroy Undead", "Turn Undead destroys weak undead.", false),
    (6, "Domain Feature", "Gain a feature from your divine domain.", true),
    (8, "Domain Feature", "Gain a feature from your divine domain.", true),
    (10, "Divine Intervention", "Call on your deity to intervene.", false),
    (17, "Domain Feature", "Gain a feature from your divine domain.", true),
    (20, "Divine Intervention Improvement", "Divine Intervention succeeds automatically.", false),
];

const DRUID: &[FeatureRow] = &[
    (1, "Spellcasting", "Cast druid spells using WIS.", false),
    (1, "Druidic", "You know the secret language of druids.", false),
    (2, "Wild Shape", "Transform into a beast you have seen, twice per rest.", false),
    (2, "Druid Circle", "Choose your druid circle.", true),
    (6, "Circle Feature", "Gain a feature from your druid circle.", true),
    (10, "Circle Feature", "Gain a feature from your druid circle.", true),
    (14, "Circle Feature", "Gain a feature from your druid circle.", true),
    (18, "Timeless Body", "You age more slowly.", false),
    (18, "Beast Spells", "Cast spells while in Wild Shape.", false),
    (20, "Archdruid", "Use Wild Shape an unlimited number of times.", false),
];

const FIGHTER: &[FeatureRow] = &[
    (1, "Fighting Style", "Adopt a particular style of fighting.", false),
    (1, "Second Wind", "Regain 1d10 + fighter level HP as a bonus action.", false),
    (2, "Action Surge", "Take one additional action on your turn.", false),
    (3, "Martial Archetype", "Choose your martial archetype.", true),
    (5, "Extra Attack", "Attack twice when taking the Attack action.", false),
    (7, "Archetype Feature", "Gain a feature from your martial archetype.", true),
    (9, "Indomitable", "Reroll a failed saving throw.", false),
    (10, "Archetype Feature", "Gain a feature from your martial archetype.", true),
    (11, "Extra Attack (2)", "Attack three times when taking the Attack action.", false),
    (15, "Archetype Feature", "Gain a feature from your martial archetype.", true),
    (18, "Archetype Feature", "Gain a feature from your martial archetype.", true),
    (20, "Extra Attack (3)", "Attack four times when taking the Attack action.", false),
];

const MONK: &[FeatureRow] = &[
    (1, "Unarmored Defense", "Without armor, AC equals 10 + DEX + WIS.", false),
    (1, "Martial Arts", "Use DEX for unarmed strikes and monk weapons.", false),
    (2, "Ki", "Spend ki points to fuel special techniques.", false),
    (2, "Unarmored Movement", "Speed increases while unarmored.", false),
    (3, "Monastic Tradition", "Choose your monastic tradition.", true),
    (3, "Deflect Missiles", "Reduce damage from ranged weapon attacks.", false),
    (4, "Slow Fall", "Reduce falling damage.", false),
    (5, "Extra Attack", "Attack twice when taking the Attack action.", false),
    (5, "Stunning Strike", "Spend ki to attempt to stun a creature you hit.", false),
    (6, "Tradition Feature", "Gain a feature from your monastic tradition.", true),
    (7, "Evasion", "Take no damage on a successful DEX save for half.", false),
    (10, "Purity of Body", "Immunity to disease and poison.", false),
    (11, "Tradition Feature", "Gain a feature from your monastic tradition.", true),
    (14, "Diamond Soul", "Proficiency in all saving throws.", false),
    (17, "Tradition Feature", "Gain a feature from your monastic tradition.", true),
    (20, "Perfect Self", "Regain 4 ki when rolling initiative with none left.", false),
];

const PALADIN: &[FeatureRow] = &[
    (1, "Divine Sense", "Detect celestials, fiends and undead nearby.", false),
    (1, "Lay on Hands", "Heal from a pool of HP equal to five times your level.", false),
    (2, "Fighting Style", "Adopt a particular style of fighting.", false),
    (2, "Spellcasting", "Cast paladin spells using CHA.", false),
    (2, "Divine Smite", "Expend a spell slot to deal extra radiant damage.", false),
    (3, "Sacred Oath", "Choose your sacred oath.", true),
    (5, "Extra Attack", "Attack twice when taking the Attack action.", false),
    (6, "Aura of Protection", "Allies nearby add your CHA modifier to saves.", false),
    (7, "Oath Feature", "Gain a feature from your sacred oath.", true),
    (11, "Improved Divine Smite", "Melee weapon hits deal an extra 1d8 radiant damage.", false),
    (15, "Oath Feature", "Gain a feature from your sacred oath.", true),
    (20, "Oath Feature", "Gain a feature from your sacred oath.", true),
];

const RANGER: &[FeatureRow] = &[
    (1, "Favored Enemy", "Advantage on tracking and recalling lore about a chosen foe.", false),
    (1, "Natural Explorer", "Benefits when traveling in a favored terrain.", false),
    (2, "Fighting Style", "Adopt a particular style of fighting.", false),
    (2, "Spellcasting", "Cast ranger spells using WIS.", false),
    (3, "Ranger Archetype", "Choose your ranger archetype.", true),
    (5, "Extra Attack", "Attack twice when taking the Attack action.", false),
    (7, "Archetype Feature", "Gain a feature from your ranger archetype.", true),
    (8, "Land's Stride", "Nonmagical difficult terrain costs no extra movement.", false),
    (11, "Archetype Feature", "Gain a feature from your ranger archetype.", true),
    (15, "Archetype Feature", "Gain a feature from your ranger archetype.", true),
    (20, "Foe Slayer", "Add WIS to one attack or damage roll per turn against a favored enemy.", false),
];

const ROGUE: &[FeatureRow] = &[
    (1, "Expertise", "Double proficiency for two skills.", false),
    (1, "Sneak Attack", "Deal extra damage once per turn with advantage or an adjacent ally.", false),
    (2, "Cunning Action", "Dash, Disengage or Hide as a bonus action.", false),
    (3, "Roguish Archetype", "Choose your roguish archetype.", true),
    (5, "Uncanny Dodge", "Halve the damage of an attack you can see.", false),
    (7, "Evasion", "Take no damage on a successful DEX save for half.", false),
    (9, "Archetype Feature", "Gain a feature from your roguish archetype.", true),
    (11, "Reliable Talent", "Treat d20 rolls below 10 as 10 on proficient checks.", false),
    (13, "Archetype Feature", "Gain a feature from your roguish archetype.", true),
    (17, "Archetype Feature", "Gain a feature from your roguish archetype.", true),
    (20, "Stroke of Luck", "Turn a miss into a hit or a failed check into a 20.", false),
];

const SORCERER: &[FeatureRow] = &[
    (1, "Spellcasting", "Cast sorcerer spells using CHA.", false),
    (1, "Sorcerous Origin", "Choose your sorcerous origin.", true),
    (2, "Font of Magic", "Gain sorcery points and convert them to and from spell slots.", false),
    (3, "Metamagic", "Choose two metamagic options.", false),
    (6, "Origin Feature", "Gain a feature from your sorcerous origin.", true),
    (10, "Metamagic", "Choose one more metamagic option.", false),
    (14, "Origin Feature", "Gain a feature from your sorcerous origin.", true),
    (17, "Metamagic", "Choose one more metamagic option.", false),
    (18, "Origin Feature", "Gain a feature from your sorcerous origin.", true),
    (20, "Sorcerous Restoration", "Regain 4 sorcery points on a short rest.", false),
];

const WARLOCK: &[FeatureRow] = &[
    (1, "Otherworldly Patron", "Choose your otherworldly patron.", true),
    (1, "Pact Magic", "Cast warlock spells; slots recover on a short rest.", false),
    (2, "Eldritch Invocations", "Learn two eldritch invocations.", false),
    (3, "Pact Boon", "Choose the Pact of the Chain, Blade or Tome.", false),
    (6, "Patron Feature", "Gain a feature from your otherworldly patron.", true),
    (10, "Patron Feature", "Gain a feature from your otherworldly patron.", true),
    (11, "Mystic Arcanum", "Cast one 6th-level spell once per long rest.", false),
    (14, "Patron Feature", "Gain a feature from your otherworldly patron.", true),
    (20, "Eldritch Master", "Regain all pact slots once per long rest.", false),
];

const WIZARD: &[FeatureRow] = &[
    (1, "Spellcasting", "Cast wizard spells from your spellbook using INT.", false),
    (1, "Arcane Recovery", "Recover spell slots on a short rest once per day.", false),
    (2, "Arcane Tradition", "Choose your arcane tradition.", true),
    (6, "Tradition Feature", "Gain a feature from your arcane tradition.", true),
    (10, "Tradition Feature", "Gain a feature from your arcane tradition.", true),
    (14, "Tradition Feature", "Gain a feature from your arcane tradition.", true),
    (18, "Spell Mastery", "Cast two chosen low-level spells at will.", false),
    (20, "Signature Spells", "Two 3rd-level spells are always prepared.", false),
];
