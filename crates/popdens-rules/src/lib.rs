//! World rules for region-managed servers.
//!
//! Explosion suppression around region posts, sapling and grass regrowth,
//! monster-spawn throttling under load, and companion-animal spawning. Each
//! rule reads the world through `ServerApi` and issues at most one kind of
//! mutation per event.

pub mod companion;
pub mod config;
pub mod error;
pub mod explosion;
pub mod idle;
pub mod plugin;
pub mod spawn_governor;
pub mod spawn_ground;
pub mod vegetation;

#[cfg(test)]
pub(crate) mod testing;

pub use config::RulesConfig;
pub use error::RulesError;
pub use plugin::PopulationDensityPlugin;
