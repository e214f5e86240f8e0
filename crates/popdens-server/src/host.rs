//! In-memory server state: worlds, entities, regions, and idle timers.

use std::collections::{BTreeMap, HashMap};

use popdens_plugin_api::{EntityKind, NearbyEntity, PlayerRef};
use popdens_world::chunk::MIN_Y;
use popdens_world::flat_generator::generate_flat_world;
use popdens_world::{
    BlockPos, BlockSource, Dimension, Location, Material, MemoryWorld, RegionCoords, RegionGrid,
    WorldId,
};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::plugin_manager::PendingAction;

/// A named world.
pub struct HostWorld {
    pub name: String,
    pub blocks: MemoryWorld,
}

/// An entity in the world, keyed by runtime id.
#[derive(Debug, Clone)]
pub struct EntityRecord {
    pub kind: EntityKind,
    pub location: Location,
}

pub struct HostState {
    worlds: Vec<HostWorld>,
    entities: BTreeMap<u64, EntityRecord>,
    next_runtime_id: u64,
    /// Last-active tick per player uuid.
    idle_since: HashMap<String, u64>,
    grid: RegionGrid,
    open_region: RegionCoords,
    managed_world: Option<WorldId>,
    tick: u64,
}

impl HostState {
    /// Generate every configured world and resolve the region settings.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let mut worlds: Vec<HostWorld> = Vec::with_capacity(config.worlds.len());
        for section in &config.worlds {
            if worlds.iter().any(|w| w.name == section.name) {
                return Err(ServerError::DuplicateWorld(section.name.clone()));
            }
            let blocks = match section.generator.as_str() {
                "flat" => generate_flat_world(section.dimension, section.radius_chunks),
                "void" => MemoryWorld::new(section.dimension),
                other => {
                    return Err(ServerError::UnknownGenerator {
                        world: section.name.clone(),
                        generator: other.to_string(),
                    })
                }
            };
            info!(
                "World {} ({:?}, generator: {}, {} chunks)",
                section.name,
                section.dimension,
                section.generator,
                blocks.column_count()
            );
            worlds.push(HostWorld {
                name: section.name.clone(),
                blocks,
            });
        }

        let regions = &config.regions;
        if regions.size <= 0 {
            return Err(ServerError::InvalidRegionSize(regions.size));
        }
        let managed_world = if regions.managed_world.is_empty() {
            None
        } else {
            let index = worlds
                .iter()
                .position(|w| w.name == regions.managed_world)
                .ok_or_else(|| ServerError::UnknownManagedWorld(regions.managed_world.clone()))?;
            Some(WorldId(index as u32))
        };

        Ok(Self {
            worlds,
            entities: BTreeMap::new(),
            next_runtime_id: 1,
            idle_since: HashMap::new(),
            grid: RegionGrid::new(regions.size),
            open_region: RegionCoords::new(regions.open_x, regions.open_z),
            managed_world,
            tick: 0,
        })
    }

    pub fn world_id(&self, name: &str) -> Option<WorldId> {
        self.worlds
            .iter()
            .position(|w| w.name == name)
            .map(|i| WorldId(i as u32))
    }

    pub fn world(&self, id: WorldId) -> Option<&HostWorld> {
        self.worlds.get(id.0 as usize)
    }

    fn world_mut(&mut self, id: WorldId) -> Option<&mut HostWorld> {
        self.worlds.get_mut(id.0 as usize)
    }

    pub fn has_world(&self, id: WorldId) -> bool {
        self.world(id).is_some()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn advance_tick(&mut self) {
        self.advance_ticks(1);
    }

    /// Move the clock forward `n` ticks, stopping at `u64::MAX`.
    pub fn advance_ticks(&mut self, n: u64) {
        self.tick = self.tick.saturating_add(n);
    }

    pub fn set_open_region(&mut self, region: RegionCoords) {
        info!("Open region is now {}", region);
        self.open_region = region;
    }

    // ─── Reads ───────────────────────────────────────────────────────────

    pub fn resolve_region(&self, location: &Location) -> Option<RegionCoords> {
        if Some(location.world) != self.managed_world {
            return None;
        }
        Some(self.grid.region_of(location))
    }

    pub fn region_center(&self, region: RegionCoords) -> Location {
        let (x, z) = self.grid.center_of(region);
        let world = self.managed_world.unwrap_or(WorldId(0));
        Location::new(world, x as f64, 0.0, z as f64)
    }

    pub fn open_region(&self) -> RegionCoords {
        self.open_region
    }

    pub fn managed_world(&self) -> Option<WorldId> {
        self.managed_world
    }

    /// Unknown worlds report as overworld.
    pub fn dimension(&self, world: WorldId) -> Dimension {
        self.world(world)
            .map_or(Dimension::Overworld, |w| w.blocks.dimension())
    }

    pub fn block_at(&self, world: WorldId, pos: BlockPos) -> Material {
        self.world(world)
            .map_or(Material::Air, |w| w.blocks.block_at(pos))
    }

    pub fn highest_solid_y(&self, world: WorldId, x: i32, z: i32) -> i32 {
        self.world(world)
            .map_or(MIN_Y, |w| w.blocks.highest_solid_y(x, z))
    }

    /// Entities in the box `center ± half_extents` (inclusive), in runtime-id order.
    pub fn nearby_entities(
        &self,
        center: &Location,
        half_extents: (f64, f64, f64),
        exclude: Option<u64>,
    ) -> Vec<NearbyEntity> {
        let (hx, hy, hz) = half_extents;
        self.entities
            .iter()
            .filter(|(id, _)| Some(**id) != exclude)
            .filter(|(_, e)| {
                e.location.world == center.world
                    && (e.location.x - center.x).abs() <= hx
                    && (e.location.y - center.y).abs() <= hy
                    && (e.location.z - center.z).abs() <= hz
            })
            .map(|(id, e)| NearbyEntity {
                runtime_id: *id,
                kind: e.kind.clone(),
                location: e.location,
            })
            .collect()
    }

    pub fn entity(&self, runtime_id: u64) -> Option<&EntityRecord> {
        self.entities.get(&runtime_id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Tick at which the player last dealt damage, if ever.
    pub fn idle_since(&self, player: &PlayerRef) -> Option<u64> {
        self.idle_since.get(&player.uuid).copied()
    }

    // ─── Writes ──────────────────────────────────────────────────────────

    /// Add an entity under a fresh runtime id. `None` once every id is taken.
    pub fn spawn_entity(&mut self, kind: EntityKind, location: Location) -> Option<u64> {
        let runtime_id = (self.next_runtime_id..=u64::MAX)
            .find(|id| !self.entities.contains_key(id))?;
        self.store(runtime_id, kind, location);
        Some(runtime_id)
    }

    /// Add an entity under a caller-chosen runtime id. An id that is already
    /// in use is left alone and `false` is returned.
    pub fn insert_entity(&mut self, runtime_id: u64, kind: EntityKind, location: Location) -> bool {
        if self.entities.contains_key(&runtime_id) {
            return false;
        }
        self.store(runtime_id, kind, location);
        true
    }

    fn store(&mut self, runtime_id: u64, kind: EntityKind, location: Location) {
        self.next_runtime_id = self.next_runtime_id.max(runtime_id.saturating_add(1));
        self.entities
            .insert(runtime_id, EntityRecord { kind, location });
    }

    pub fn remove_entity(&mut self, runtime_id: u64) -> Option<EntityRecord> {
        self.entities.remove(&runtime_id)
    }

    pub fn set_block(&mut self, world: WorldId, pos: BlockPos, material: Material) -> bool {
        match self.world_mut(world) {
            Some(w) => w.blocks.set_block(pos, material),
            None => false,
        }
    }

    /// Apply deferred plugin writes in order. Returns how many took effect.
    pub fn apply_actions(&mut self, actions: Vec<PendingAction>) -> usize {
        let mut applied = 0;
        for action in actions {
            match action {
                PendingAction::SetBlock {
                    world,
                    pos,
                    material,
                } => {
                    if self.set_block(world, pos, material) {
                        applied += 1;
                    }
                }
                PendingAction::SpawnMob { mob, location } => {
                    if !self.has_world(location.world) {
                        continue;
                    }
                    match self.spawn_entity(EntityKind::Mob(mob), location) {
                        Some(id) => {
                            debug!("Spawned {} (runtime id {}) at {:?}", mob, id, location);
                            applied += 1;
                        }
                        None => warn!("No free runtime id for {}", mob),
                    }
                }
                PendingAction::ResetIdleTimer { player } => {
                    self.idle_since.insert(player.uuid, self.tick);
                    applied += 1;
                }
            }
        }
        applied
    }
}

/// Two flat worlds with 32-block regions over the first.
#[cfg(test)]
pub(crate) fn test_config() -> ServerConfig {
    toml::from_str(
        r#"
        [server]
        name = "test"

        [[worlds]]
        name = "world"
        radius_chunks = 2

        [[worlds]]
        name = "nether"
        dimension = "nether"
        radius_chunks = 1

        [regions]
        size = 32

        [logging]
        level = "debug"
        "#,
    )
    .unwrap()
}
