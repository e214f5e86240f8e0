//! Companion animals for natural monster spawns in the open region.
//!
//! A deterministic counter lets one qualifying monster spawn in five bring
//! an animal along. The first qualifying spawn after startup triggers.

use popdens_plugin_api::{ServerApi, SpawnedMob};
use popdens_world::{Material, MobType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::vegetation::{regrow_grass, GRASS_REGROW_RADIUS};

/// Qualifying spawns per companion.
pub const RESPAWN_ANIMAL_PERIOD: u32 = 5;

/// Half-extents of the box that must be free of passive mobs.
pub const PASSIVE_CLEARANCE: (f64, f64, f64) = (30.0, 30.0, 30.0);

/// The animal that accompanies a monster species, if any.
pub fn companion_for<R: Rng>(mob: MobType, rng: &mut R) -> Option<MobType> {
    match mob {
        MobType::Creeper => Some(MobType::Chicken),
        MobType::Zombie => Some(MobType::Cow),
        MobType::Spider => Some(MobType::Sheep),
        MobType::Skeleton => Some(MobType::Pig),
        MobType::Enderman => Some(if rng.gen::<bool>() {
            MobType::Horse
        } else {
            MobType::Wolf
        }),
        _ => None,
    }
}

pub struct CompanionSpawner<R = StdRng> {
    counter: u32,
    rng: R,
}

impl CompanionSpawner<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for CompanionSpawner<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> CompanionSpawner<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { counter: 1, rng }
    }

    /// Spawns left before the next trigger. Always positive between calls.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    /// Handle a hostile natural spawn in the managed world. Returns the
    /// companion spawned, if any.
    pub fn on_monster_spawn(
        &mut self,
        spawn: &SpawnedMob,
        api: &mut dyn ServerApi,
    ) -> Option<MobType> {
        let location = &spawn.location;
        if api.resolve_region(location) != Some(api.open_region()) {
            return None;
        }

        let pos = location.block_pos();
        if api.block_at(location.world, pos.below()) != Material::GrassBlock {
            return None;
        }

        self.counter -= 1;
        if self.counter > 0 {
            return None;
        }
        self.counter = RESPAWN_ANIMAL_PERIOD;

        let crowded = api
            .nearby_entities(location, PASSIVE_CLEARANCE, Some(spawn.runtime_id))
            .iter()
            .any(|e| e.kind.is_passive_mob());
        if crowded {
            debug!("Skipping companion for {}: animals nearby", spawn.mob);
            return None;
        }

        let companion = companion_for(spawn.mob, &mut self.rng)?;
        debug!("Spawning {} alongside {} at {:?}", companion, spawn.mob, pos);
        api.spawn_mob(companion, location);
        regrow_grass(location.world, pos, GRASS_REGROW_RADIUS, api);
        Some(companion)
    }
}
