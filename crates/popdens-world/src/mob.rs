//! Mob type definitions.
//!
//! A fixed registry of the creature species the world rules distinguish,
//! with their namespaced identifiers and spawn categories.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mob category used by the spawn rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobCategory {
    /// Monsters: the targets of grinder throttling.
    Hostile,
    /// Farm animals and other breedable creatures.
    Passive,
    /// Bats, squid, and others that are neither.
    Ambient,
}

/// A creature species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum MobType {
    Zombie,
    Skeleton,
    Creeper,
    Spider,
    CaveSpider,
    Enderman,
    Witch,
    ZombifiedPiglin,
    Blaze,
    Cow,
    Pig,
    Sheep,
    Chicken,
    Horse,
    Wolf,
    Rabbit,
    Bat,
    Squid,
}

/// Definition of a mob type.
#[derive(Debug, Clone)]
pub struct MobDefinition {
    pub mob: MobType,
    /// Namespaced identifier, e.g. `"minecraft:zombie"`.
    pub type_id: &'static str,
    /// Display name, e.g. `"Zombie"`.
    pub display_name: &'static str,
    pub category: MobCategory,
}

macro_rules! mob {
    ($variant:ident, $type_id:expr, $display:expr, $category:ident) => {
        MobDefinition {
            mob: MobType::$variant,
            type_id: $type_id,
            display_name: $display,
            category: MobCategory::$category,
        }
    };
}

/// Indexed by discriminant; keep in declaration order.
static MOB_DATA: &[MobDefinition] = &[
    mob!(Zombie, "minecraft:zombie", "Zombie", Hostile),
    mob!(Skeleton, "minecraft:skeleton", "Skeleton", Hostile),
    mob!(Creeper, "minecraft:creeper", "Creeper", Hostile),
    mob!(Spider, "minecraft:spider", "Spider", Hostile),
    mob!(CaveSpider, "minecraft:cave_spider", "Cave Spider", Hostile),
    mob!(Enderman, "minecraft:enderman", "Enderman", Hostile),
    mob!(Witch, "minecraft:witch", "Witch", Hostile),
    mob!(ZombifiedPiglin, "minecraft:zombified_piglin", "Zombified Piglin", Hostile),
    mob!(Blaze, "minecraft:blaze", "Blaze", Hostile),
    mob!(Cow, "minecraft:cow", "Cow", Passive),
    mob!(Pig, "minecraft:pig", "Pig", Passive),
    mob!(Sheep, "minecraft:sheep", "Sheep", Passive),
    mob!(Chicken, "minecraft:chicken", "Chicken", Passive),
    mob!(Horse, "minecraft:horse", "Horse", Passive),
    mob!(Wolf, "minecraft:wolf", "Wolf", Passive),
    mob!(Rabbit, "minecraft:rabbit", "Rabbit", Passive),
    mob!(Bat, "minecraft:bat", "Bat", Ambient),
    mob!(Squid, "minecraft:squid", "Squid", Ambient),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mob type: {0}")]
pub struct UnknownMob(pub String);

impl MobType {
    pub fn definition(self) -> &'static MobDefinition {
        &MOB_DATA[self as usize]
    }

    pub fn type_id(self) -> &'static str {
        self.definition().type_id
    }

    pub fn category(self) -> MobCategory {
        self.definition().category
    }

    pub fn is_hostile(self) -> bool {
        self.category() == MobCategory::Hostile
    }

    pub fn is_passive(self) -> bool {
        self.category() == MobCategory::Passive
    }

    /// Look up a mob by type id. The `minecraft:` namespace is optional.
    pub fn from_type_id(type_id: &str) -> Option<Self> {
        let bare = type_id.strip_prefix("minecraft:").unwrap_or(type_id);
        MOB_DATA
            .iter()
            .find(|def| &def.type_id["minecraft:".len()..] == bare)
            .map(|def| def.mob)
    }

    /// All known mob definitions.
    pub fn all() -> &'static [MobDefinition] {
        MOB_DATA
    }
}

impl From<MobType> for &'static str {
    fn from(mob: MobType) -> Self {
        mob.type_id()
    }
}

impl TryFrom<String> for MobType {
    type Error = UnknownMob;

    fn try_from(type_id: String) -> Result<Self, Self::Error> {
        MobType::from_type_id(&type_id).ok_or(UnknownMob(type_id))
    }
}

impl std::fmt::Display for MobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.definition().display_name)
    }
}
