//! Ground materials monsters may naturally spawn on while grinders are stopped.
//!
//! Built once at startup and handed to the spawn governor. The table is total
//! over `Dimension`, so every dimension always has an entry.

use std::collections::HashSet;

use popdens_world::{Dimension, Material};

use crate::config::SpawnGroundConfig;
use crate::error::RulesError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnGroundTable {
    overworld: HashSet<Material>,
    nether: HashSet<Material>,
    end: HashSet<Material>,
}

impl Default for SpawnGroundTable {
    fn default() -> Self {
        Self::vanilla()
    }
}

impl SpawnGroundTable {
    /// Natural terrain for each dimension; player-built floors are excluded.
    pub fn vanilla() -> Self {
        Self {
            overworld: HashSet::from([
                Material::GrassBlock,
                Material::Sand,
                Material::SuspiciousSand,
                Material::Gravel,
                Material::SuspiciousGravel,
                Material::Stone,
                Material::MossyCobblestone,
                Material::Obsidian,
            ]),
            nether: HashSet::from([Material::Netherrack, Material::NetherBrick]),
            end: HashSet::from([Material::EndStone, Material::Obsidian]),
        }
    }

    /// Build from a config override, or the vanilla table when absent.
    pub fn from_config(config: Option<&SpawnGroundConfig>) -> Result<Self, RulesError> {
        let Some(config) = config else {
            return Ok(Self::vanilla());
        };
        config.validate()?;
        Ok(Self {
            overworld: config.overworld.iter().copied().collect(),
            nether: config.nether.iter().copied().collect(),
            end: config.end.iter().copied().collect(),
        })
    }

    pub fn ground_for(&self, dimension: Dimension) -> &HashSet<Material> {
        match dimension {
            Dimension::Overworld => &self.overworld,
            Dimension::Nether => &self.nether,
            Dimension::End => &self.end,
        }
    }

    pub fn allows(&self, dimension: Dimension, ground: Material) -> bool {
        self.ground_for(dimension).contains(&ground)
    }
}
