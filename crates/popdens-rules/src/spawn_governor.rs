//! Creature-spawn throttling.
//!
//! While the load monitor has grinders stopped, spawner and portal spawns are
//! refused and natural monsters must stand on natural ground. Independently,
//! a configured limit caps how many monsters may crowd around a new one.
//! Surviving natural spawns in the managed world feed grass regrowth and the
//! companion spawner.

use popdens_plugin_api::{EventResult, ServerApi, ServerStatus, SpawnReason, SpawnedMob};
use popdens_world::Material;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use crate::companion::CompanionSpawner;
use crate::config::RulesConfig;
use crate::spawn_ground::SpawnGroundTable;
use crate::vegetation::{regrow_grass, GRASS_REGROW_RADIUS};

/// Half-extents of the box searched for crowding monsters.
pub const MONSTER_DENSITY_EXTENTS: (f64, f64, f64) = (10.0, 20.0, 10.0);

/// Why a spawn was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelCause {
    /// Spawner or portal spawn while grinders are stopped.
    GrinderSource(SpawnReason),
    /// Natural monster on ground outside the table while grinders are stopped.
    DisallowedGround(Material),
    /// More monsters nearby than the configured limit.
    MonsterDensity { nearby: usize, limit: usize },
}

pub struct SpawnGovernor<R = StdRng> {
    ground: SpawnGroundTable,
    companions: CompanionSpawner<R>,
}

impl SpawnGovernor<StdRng> {
    pub fn new(ground: SpawnGroundTable) -> Self {
        Self::with_companions(ground, CompanionSpawner::new())
    }
}

impl<R: Rng> SpawnGovernor<R> {
    pub fn with_companions(ground: SpawnGroundTable, companions: CompanionSpawner<R>) -> Self {
        Self { ground, companions }
    }

    pub fn ground(&self) -> &SpawnGroundTable {
        &self.ground
    }

    pub fn set_ground(&mut self, ground: SpawnGroundTable) {
        self.ground = ground;
    }

    pub fn companions(&self) -> &CompanionSpawner<R> {
        &self.companions
    }

    /// Decide whether a spawn must be cancelled. Performs no writes.
    pub fn check(
        &self,
        spawn: &SpawnedMob,
        reason: SpawnReason,
        status: &ServerStatus,
        config: &RulesConfig,
        api: &dyn ServerApi,
    ) -> Option<CancelCause> {
        let hostile = spawn.mob.is_hostile();

        if status.grinders_stopped {
            match reason {
                SpawnReason::NetherPortal | SpawnReason::Spawner => {
                    return Some(CancelCause::GrinderSource(reason));
                }
                SpawnReason::Natural if hostile => {
                    let location = &spawn.location;
                    let below = location.block_pos().below();
                    let ground = api.block_at(location.world, below);
                    let dimension = api.dimension(location.world);
                    if !self.ground.allows(dimension, ground) {
                        return Some(CancelCause::DisallowedGround(ground));
                    }
                }
                _ => {}
            }
        }

        let exempt = matches!(reason, SpawnReason::SpawnerEgg | SpawnReason::Spawner);
        if let Some(limit) = config.monster_limit() {
            if hostile && !exempt {
                let mut nearby = 0;
                for entity in api.nearby_entities(
                    &spawn.location,
                    MONSTER_DENSITY_EXTENTS,
                    Some(spawn.runtime_id),
                ) {
                    if entity.kind.is_hostile_mob() {
                        nearby += 1;
                        if nearby > limit {
                            return Some(CancelCause::MonsterDensity { nearby, limit });
                        }
                    }
                }
            }
        }

        None
    }

    /// Handle a creature-spawn event.
    pub fn on_creature_spawn(
        &mut self,
        spawn: &SpawnedMob,
        reason: SpawnReason,
        status: &ServerStatus,
        config: &RulesConfig,
        api: &mut dyn ServerApi,
    ) -> EventResult {
        if let Some(cause) = self.check(spawn, reason, status, config, &*api) {
            debug!(
                "Cancelled {:?} spawn of {} at {:?}: {:?}",
                reason,
                spawn.mob,
                spawn.location.block_pos(),
                cause
            );
            return EventResult::Cancelled;
        }

        if reason != SpawnReason::Natural || api.managed_world() != Some(spawn.location.world) {
            return EventResult::Continue;
        }

        if spawn.mob.is_passive() && config.regrow_grass {
            let pos = spawn.location.block_pos();
            regrow_grass(spawn.location.world, pos, GRASS_REGROW_RADIUS, api);
        } else if spawn.mob.is_hostile() && config.respawn_animals {
            self.companions.on_monster_spawn(spawn, api);
        }

        EventResult::Continue
    }
}
