//! Rules configuration, loaded from the plugin's JSON config file.

use popdens_world::{Dimension, Material};
use serde::{Deserialize, Serialize};

use crate::error::RulesError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Replant despawning saplings in the open region.
    pub regrow_trees: bool,
    /// Regrow short grass around natural animal spawns.
    pub regrow_grass: bool,
    /// Occasionally pair natural monster spawns with an animal.
    pub respawn_animals: bool,
    /// Hostile mobs allowed near a new monster spawn. Negative = unlimited.
    pub nearby_monster_spawn_limit: i32,
    /// Overrides the built-in ground table used while grinders are stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn_ground: Option<SpawnGroundConfig>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            regrow_trees: true,
            regrow_grass: true,
            respawn_animals: true,
            nearby_monster_spawn_limit: -1,
            spawn_ground: None,
        }
    }
}

/// Materials monsters may spawn on while grinders are stopped, per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnGroundConfig {
    pub overworld: Vec<Material>,
    pub nether: Vec<Material>,
    pub end: Vec<Material>,
}

impl SpawnGroundConfig {
    pub fn validate(&self) -> Result<(), RulesError> {
        for (dimension, list) in [
            (Dimension::Overworld, &self.overworld),
            (Dimension::Nether, &self.nether),
            (Dimension::End, &self.end),
        ] {
            if list.is_empty() {
                return Err(RulesError::EmptySpawnGround(dimension));
            }
        }
        Ok(())
    }
}

impl RulesConfig {
    /// Parse and validate a config value.
    pub fn from_json(value: serde_json::Value) -> Result<Self, RulesError> {
        let config: Self = serde_json::from_value(value)?;
        if let Some(ground) = &config.spawn_ground {
            ground.validate()?;
        }
        Ok(config)
    }

    pub fn to_json(&self) -> serde_json::Value {
        // A struct of plain fields always serialises.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// The nearby-monster limit, or `None` when unlimited.
    pub fn monster_limit(&self) -> Option<usize> {
        usize::try_from(self.nearby_monster_spawn_limit).ok()
    }
}
