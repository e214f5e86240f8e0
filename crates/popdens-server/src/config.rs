use popdens_world::region::DEFAULT_REGION_SIZE;
use popdens_world::Dimension;
use serde::Deserialize;
use std::path::Path;

use crate::error::ServerError;

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub server: ServerSection,
    #[serde(default = "default_worlds")]
    pub worlds: Vec<WorldSection>,
    #[serde(default)]
    pub regions: RegionsSection,
    #[serde(default)]
    pub load: LoadSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    pub name: String,
    /// Directory holding `<plugin>/config.json` files.
    #[serde(default = "default_plugin_dir")]
    pub plugin_dir: String,
}

fn default_plugin_dir() -> String {
    "plugins".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorldSection {
    pub name: String,
    #[serde(default = "default_dimension")]
    pub dimension: Dimension,
    #[serde(default = "default_generator")]
    pub generator: String,
    /// Chunks generated in each direction around the origin.
    #[serde(default = "default_radius_chunks")]
    pub radius_chunks: i32,
}

fn default_dimension() -> Dimension {
    Dimension::Overworld
}

fn default_generator() -> String {
    "flat".into()
}

fn default_radius_chunks() -> i32 {
    4
}

fn default_worlds() -> Vec<WorldSection> {
    vec![WorldSection {
        name: "world".into(),
        dimension: default_dimension(),
        generator: default_generator(),
        radius_chunks: default_radius_chunks(),
    }]
}

#[derive(Debug, Deserialize)]
pub struct RegionsSection {
    /// World the region grid applies to. Empty disables regions.
    #[serde(default = "default_managed_world")]
    pub managed_world: String,
    #[serde(default = "default_region_size")]
    pub size: i32,
    #[serde(default)]
    pub open_x: i32,
    #[serde(default)]
    pub open_z: i32,
}

fn default_managed_world() -> String {
    "world".into()
}

fn default_region_size() -> i32 {
    DEFAULT_REGION_SIZE
}

impl Default for RegionsSection {
    fn default() -> Self {
        Self {
            managed_world: default_managed_world(),
            size: default_region_size(),
            open_x: 0,
            open_z: 0,
        }
    }
}

/// Initial load-monitor state.
#[derive(Debug, Default, Deserialize)]
pub struct LoadSection {
    #[serde(default)]
    pub grinders_stopped: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ServerError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ServerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
