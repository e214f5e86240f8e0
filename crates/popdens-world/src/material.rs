//! Material table for the blocks and items the world rules care about.
//!
//! Every material has a namespaced identifier and a footprint (solid block,
//! non-solid block, or item-only). The table is indexed by discriminant, so
//! `MATERIAL_DATA` must list entries in declaration order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A block or item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Material {
    Air,
    Bedrock,
    Stone,
    Cobblestone,
    MossyCobblestone,
    Obsidian,
    Dirt,
    GrassBlock,
    ShortGrass,
    Snow,
    Sand,
    SuspiciousSand,
    Gravel,
    SuspiciousGravel,
    Water,
    OakPlanks,
    Netherrack,
    NetherBrick,
    EndStone,
    OakSapling,
    SpruceSapling,
    BirchSapling,
    JungleSapling,
    AcaciaSapling,
    DarkOakSapling,
    CherrySapling,
    MangrovePropagule,
    OakLog,
    SpruceLog,
    BirchLog,
    JungleLog,
    AcaciaLog,
    DarkOakLog,
    CherryLog,
    MangroveLog,
    Bone,
    RottenFlesh,
}

/// How a material occupies the world grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Footprint {
    /// Full collision block; counts as terrain surface.
    Solid,
    /// Placeable but passable (plants, snow layers, fluids).
    NonSolid,
    /// Only exists as a dropped item.
    Item,
}

/// Static properties of a material.
#[derive(Debug, Clone)]
pub struct MaterialInfo {
    pub material: Material,
    /// Namespaced identifier, e.g. `"minecraft:stone"`.
    pub name: &'static str,
    pub footprint: Footprint,
}

macro_rules! material {
    ($variant:ident, $name:expr, $footprint:ident) => {
        MaterialInfo {
            material: Material::$variant,
            name: $name,
            footprint: Footprint::$footprint,
        }
    };
}

static MATERIAL_DATA: &[MaterialInfo] = &[
    material!(Air, "minecraft:air", NonSolid),
    material!(Bedrock, "minecraft:bedrock", Solid),
    material!(Stone, "minecraft:stone", Solid),
    material!(Cobblestone, "minecraft:cobblestone", Solid),
    material!(MossyCobblestone, "minecraft:mossy_cobblestone", Solid),
    material!(Obsidian, "minecraft:obsidian", Solid),
    material!(Dirt, "minecraft:dirt", Solid),
    material!(GrassBlock, "minecraft:grass_block", Solid),
    material!(ShortGrass, "minecraft:short_grass", NonSolid),
    material!(Snow, "minecraft:snow", NonSolid),
    material!(Sand, "minecraft:sand", Solid),
    material!(SuspiciousSand, "minecraft:suspicious_sand", Solid),
    material!(Gravel, "minecraft:gravel", Solid),
    material!(SuspiciousGravel, "minecraft:suspicious_gravel", Solid),
    material!(Water, "minecraft:water", NonSolid),
    material!(OakPlanks, "minecraft:oak_planks", Solid),
    material!(Netherrack, "minecraft:netherrack", Solid),
    material!(NetherBrick, "minecraft:nether_bricks", Solid),
    material!(EndStone, "minecraft:end_stone", Solid),
    // ===== Saplings =====
    material!(OakSapling, "minecraft:oak_sapling", NonSolid),
    material!(SpruceSapling, "minecraft:spruce_sapling", NonSolid),
    material!(BirchSapling, "minecraft:birch_sapling", NonSolid),
    material!(JungleSapling, "minecraft:jungle_sapling", NonSolid),
    material!(AcaciaSapling, "minecraft:acacia_sapling", NonSolid),
    material!(DarkOakSapling, "minecraft:dark_oak_sapling", NonSolid),
    material!(CherrySapling, "minecraft:cherry_sapling", NonSolid),
    material!(MangrovePropagule, "minecraft:mangrove_propagule", NonSolid),
    // ===== Logs =====
    material!(OakLog, "minecraft:oak_log", Solid),
    material!(SpruceLog, "minecraft:spruce_log", Solid),
    material!(BirchLog, "minecraft:birch_log", Solid),
    material!(JungleLog, "minecraft:jungle_log", Solid),
    material!(AcaciaLog, "minecraft:acacia_log", Solid),
    material!(DarkOakLog, "minecraft:dark_oak_log", Solid),
    material!(CherryLog, "minecraft:cherry_log", Solid),
    material!(MangroveLog, "minecraft:mangrove_log", Solid),
    // ===== Items =====
    material!(Bone, "minecraft:bone", Item),
    material!(RottenFlesh, "minecraft:rotten_flesh", Item),
];

/// Returned when a material name is not in the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown material: {0}")]
pub struct UnknownMaterial(pub String);

impl Material {
    pub fn info(self) -> &'static MaterialInfo {
        &MATERIAL_DATA[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Look up a material by name. The `minecraft:` namespace is optional.
    pub fn from_name(name: &str) -> Option<Self> {
        let bare = name.strip_prefix("minecraft:").unwrap_or(name);
        MATERIAL_DATA
            .iter()
            .find(|info| &info.name["minecraft:".len()..] == bare)
            .map(|info| info.material)
    }

    /// Only air counts as empty when scanning for ground.
    pub fn is_empty(self) -> bool {
        self == Material::Air
    }

    pub fn is_solid(self) -> bool {
        self.info().footprint == Footprint::Solid
    }

    pub fn is_sapling(self) -> bool {
        TreeSpecies::ALL.iter().any(|s| s.sapling() == self)
    }

    pub fn is_log(self) -> bool {
        TreeSpecies::ALL.iter().any(|s| s.log() == self)
    }

    /// Whether a dropped sapling may take this cell's place.
    pub fn is_plantable_cell(self) -> bool {
        matches!(self, Material::Air | Material::ShortGrass | Material::Snow)
    }

    /// Whether a sapling can root in this block.
    pub fn is_plantable_footing(self) -> bool {
        matches!(self, Material::GrassBlock | Material::Dirt)
    }
}

impl From<Material> for &'static str {
    fn from(material: Material) -> Self {
        material.name()
    }
}

impl TryFrom<String> for Material {
    type Error = UnknownMaterial;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Material::from_name(&name).ok_or(UnknownMaterial(name))
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tree species with a sapling and a log form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeSpecies {
    Oak,
    Spruce,
    Birch,
    Jungle,
    Acacia,
    DarkOak,
    Cherry,
    Mangrove,
}

impl TreeSpecies {
    pub const ALL: [TreeSpecies; 8] = [
        TreeSpecies::Oak,
        TreeSpecies::Spruce,
        TreeSpecies::Birch,
        TreeSpecies::Jungle,
        TreeSpecies::Acacia,
        TreeSpecies::DarkOak,
        TreeSpecies::Cherry,
        TreeSpecies::Mangrove,
    ];

    pub fn sapling(self) -> Material {
        match self {
            TreeSpecies::Oak => Material::OakSapling,
            TreeSpecies::Spruce => Material::SpruceSapling,
            TreeSpecies::Birch => Material::BirchSapling,
            TreeSpecies::Jungle => Material::JungleSapling,
            TreeSpecies::Acacia => Material::AcaciaSapling,
            TreeSpecies::DarkOak => Material::DarkOakSapling,
            TreeSpecies::Cherry => Material::CherrySapling,
            TreeSpecies::Mangrove => Material::MangrovePropagule,
        }
    }

    pub fn log(self) -> Material {
        match self {
            TreeSpecies::Oak => Material::OakLog,
            TreeSpecies::Spruce => Material::SpruceLog,
            TreeSpecies::Birch => Material::BirchLog,
            TreeSpecies::Jungle => Material::JungleLog,
            TreeSpecies::Acacia => Material::AcaciaLog,
            TreeSpecies::DarkOak => Material::DarkOakLog,
            TreeSpecies::Cherry => Material::CherryLog,
            TreeSpecies::Mangrove => Material::MangroveLog,
        }
    }
}
