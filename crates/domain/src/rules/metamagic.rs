//! Sorcerer metamagic options.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetamagicOption {
    pub id: &'static str,
    pub name: &'static str,
    /// Sorcery points spent per use.
    pub cost: u32,
    pub description: &'static str,
}

pub static METAMAGIC_OPTIONS: &[MetamagicOption] = &[
    MetamagicOption {
        id: "careful",
        name: "Careful Spell",
        cost: 1,
        description: "Chosen creatures automatically succeed on the spell's saving throw.",
    },
    MetamagicOption {
        id: "distant",
        name: "Distant Spell",
        cost: 1,
        description: "Double the spell's range, or make a touch spell reach 30 feet.",
    },
    MetamagicOption {
        id: "empowered",
        name: "Empowered Spell",
        cost: 1,
        description: "Reroll a number of damage dice up to your CHA modifier.",
    },
    MetamagicOption {
        id: "extended",
        name: "Extended Spell",
        cost: 1,
        description: "Double the spell's duration, up to 24 hours.",
    },
    MetamagicOption {
        id: "heightened",
        name: "Heightened Spell",
        cost: 2,
        description: "One target has disadvantage on its first save against the spell.",
    },
    MetamagicOption {
        id: "quickened",
        name: "Quickened Spell",
        cost: 2,
        description: "Cast a one-action spell as a bonus action.",
    },
    MetamagicOption {
        id: "seeking",
        name: "Seeking Spell",
        cost: 1,
        description: "Reroll a missed spell attack roll.",
    },
    MetamagicOption {
        id: "subtle",
        name: "Subtle Spell",
        cost: 1,
        description: "Cast without somatic or verbal components.",
    },
    MetamagicOption {
        id: "transmuted",
        name: "Transmuted Spell",
        cost: 1,
        description: "Change the spell's damage type to another elemental type.",
    },
    MetamagicOption {
        id: "twinned",
        name: "Twinned Spell",
        cost: 1,
        description: "Target a second creature with a single-target spell.",
    },
];

pub fn find_metamagic(id: &str) -> Option<&'static MetamagicOption> {
    METAMAGIC_OPTIONS.iter().find(|m| m.id == id)
}
