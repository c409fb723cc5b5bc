//! Unit templates and the gacha pools drawn from them.

use anime_defence_core::{Ability, Rarity, UnitStats};

/// Template a fresh profile receives and the gacha falls back to.
pub const STARTER_TEMPLATE: &str = "kaneki";

/// Ability as declared by a template, before it is cloned into a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbilityTemplate {
    /// Display name of the ability.
    pub name: &'static str,
    /// Highest level the ability can reach.
    pub max_level: u32,
}

impl AbilityTemplate {
    /// Clones the template into a level one ability.
    #[must_use]
    pub fn instantiate(&self) -> Ability {
        Ability {
            name: self.name.to_owned(),
            level: 1,
            max_level: self.max_level,
        }
    }
}

/// Static description of a collectible unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitTemplate {
    /// Key identifying the template.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Rarity the template is listed under.
    pub rarity: Rarity,
    /// Maximum simultaneously placed instances.
    pub max_placement: u32,
    /// Placement cost in session currency.
    pub cost: u32,
    /// Statistics before the rarity roll.
    pub base_stats: UnitStats,
    /// Abilities cycled through while attacking.
    pub abilities: [AbilityTemplate; 4],
    /// Currency generated per payout, `Some` only for support units.
    pub income: Option<u32>,
}

const fn abilities(names: [&'static str; 4]) -> [AbilityTemplate; 4] {
    [
        AbilityTemplate {
            name: names[0],
            max_level: 3,
        },
        AbilityTemplate {
            name: names[1],
            max_level: 3,
        },
        AbilityTemplate {
            name: names[2],
            max_level: 3,
        },
        AbilityTemplate {
            name: names[3],
            max_level: 10,
        },
    ]
}

static TEMPLATES: [UnitTemplate; 10] = [
    UnitTemplate {
        id: "kaneki",
        name: "Dark Ghoul",
        rarity: Rarity::Common,
        max_placement: 5,
        cost: 50,
        base_stats: UnitStats::new(5, 3, 7),
        abilities: abilities(["Basic Punch", "Ghoul Transform", "Kagune Dash", "Rapid Thrust"]),
        income: None,
    },
    UnitTemplate {
        id: "goku",
        name: "Saiyan Warrior",
        rarity: Rarity::Legendary,
        max_placement: 2,
        cost: 500,
        base_stats: UnitStats::new(25, 8, 15),
        abilities: abilities(["Ki Blast", "Super Form", "Blue Form", "Ultra Instinct"]),
        income: None,
    },
    UnitTemplate {
        id: "luffy",
        name: "Rubber Pirate",
        rarity: Rarity::Legendary,
        max_placement: 2,
        cost: 450,
        base_stats: UnitStats::new(22, 6, 18),
        abilities: abilities(["Gum Pistol", "Gear Second", "Gear Fourth", "Gear Fifth"]),
        income: None,
    },
    UnitTemplate {
        id: "naruto",
        name: "Nine-Tails Host",
        rarity: Rarity::Legendary,
        max_placement: 2,
        cost: 480,
        base_stats: UnitStats::new(20, 7, 20),
        abilities: abilities(["Shadow Clone", "Rasengan", "Sage Mode", "Kurama Mode"]),
        income: None,
    },
    UnitTemplate {
        id: "ichigo",
        name: "Soul Reaper",
        rarity: Rarity::Epic,
        max_placement: 3,
        cost: 300,
        base_stats: UnitStats::new(18, 5, 16),
        abilities: abilities(["Sword Slash", "Bankai Release", "Hollow Mask", "Final Form"]),
        income: None,
    },
    UnitTemplate {
        id: "jotaro",
        name: "Stand User",
        rarity: Rarity::Epic,
        max_placement: 3,
        cost: 280,
        base_stats: UnitStats::new(16, 4, 12),
        abilities: abilities(["Star Punch", "Ora Rush", "Time Stop", "Star Platinum"]),
        income: None,
    },
    UnitTemplate {
        id: "eren",
        name: "Titan Shifter",
        rarity: Rarity::Epic,
        max_placement: 3,
        cost: 320,
        base_stats: UnitStats::new(19, 3, 8),
        abilities: abilities(["Blade Strike", "Titan Form", "Hardening", "Founding Power"]),
        income: None,
    },
    UnitTemplate {
        id: "vegeta",
        name: "Saiyan Prince",
        rarity: Rarity::Legendary,
        max_placement: 2,
        cost: 520,
        base_stats: UnitStats::new(24, 7, 17),
        abilities: abilities(["Galick Gun", "Super Saiyan", "Majin Form", "Ultra Ego"]),
        income: None,
    },
    UnitTemplate {
        id: "zoro",
        name: "Three Sword Style",
        rarity: Rarity::Rare,
        max_placement: 4,
        cost: 200,
        base_stats: UnitStats::new(15, 4, 13),
        abilities: abilities(["Single Slash", "Three Sword", "Asura Form", "King of Hell"]),
        income: None,
    },
    UnitTemplate {
        id: "speedwagon",
        name: "Speed Wagon",
        rarity: Rarity::Uncommon,
        max_placement: 3,
        cost: 100,
        base_stats: UnitStats::new(1, 1, 1),
        abilities: abilities(["Encourage", "Foundation", "Rich Support", "Money Rain"]),
        income: Some(2),
    },
];

/// Looks up a unit template by key.
#[must_use]
pub fn unit_template(template_id: &str) -> Option<&'static UnitTemplate> {
    TEMPLATES.iter().find(|template| template.id == template_id)
}

/// Every registered unit template.
#[must_use]
pub fn unit_templates() -> &'static [UnitTemplate] {
    &TEMPLATES
}

/// Template keys the gacha may award for the provided rarity.
#[must_use]
pub fn template_pool(rarity: Rarity) -> &'static [&'static str] {
    match rarity {
        Rarity::Common => &["kaneki"],
        Rarity::Uncommon => &["speedwagon"],
        Rarity::Rare => &["zoro"],
        Rarity::Epic => &["ichigo", "jotaro", "eren"],
        Rarity::Legendary => &["goku", "luffy", "naruto", "vegeta"],
        Rarity::Mythical => &["goku", "luffy", "naruto"],
    }
}
