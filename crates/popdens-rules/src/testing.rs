//! Shared test host: flat in-memory worlds behind `ServerApi`.

use popdens_plugin_api::{EntityKind, NearbyEntity, PlayerRef, ServerApi, SpawnedMob};
use popdens_world::flat_generator::{generate_flat_world, FLAT_SURFACE_Y};
use popdens_world::{
    BlockPos, BlockSource, Dimension, Location, Material, MemoryWorld, MobType, RegionCoords,
    RegionGrid, WorldId,
};

pub const OVERWORLD: WorldId = WorldId(0);
pub const NETHER: WorldId = WorldId(1);
pub const END: WorldId = WorldId(2);

/// Region edge used by tests; region (0, 0) covers blocks 0..32.
pub const TEST_REGION_SIZE: i32 = 32;

/// Y of the first air block above flat terrain.
pub const SPAWN_Y: i32 = FLAT_SURFACE_Y + 1;

pub struct MockServer {
    pub worlds: Vec<MemoryWorld>,
    pub managed: Option<WorldId>,
    pub grid: RegionGrid,
    pub open: RegionCoords,
    pub entities: Vec<NearbyEntity>,
    pub spawned: Vec<(MobType, Location)>,
    pub idle_resets: Vec<PlayerRef>,
    pub writes: Vec<(WorldId, BlockPos, Material)>,
}

impl MockServer {
    /// Three flat worlds with the overworld managed. The overworld spans
    /// blocks -48..64 on both axes, the others -16..32.
    pub fn flat() -> Self {
        Self {
            worlds: vec![
                generate_flat_world(Dimension::Overworld, 3),
                generate_flat_world(Dimension::Nether, 1),
                generate_flat_world(Dimension::End, 1),
            ],
            managed: Some(OVERWORLD),
            grid: RegionGrid::new(TEST_REGION_SIZE),
            open: RegionCoords::new(0, 0),
            entities: Vec::new(),
            spawned: Vec::new(),
            idle_resets: Vec::new(),
            writes: Vec::new(),
        }
    }

    pub fn world_mut(&mut self, world: WorldId) -> &mut MemoryWorld {
        &mut self.worlds[world.0 as usize]
    }

    pub fn block(&self, world: WorldId, pos: BlockPos) -> Material {
        self.worlds[world.0 as usize].block_at(pos)
    }

    /// Replace the block under a spawn location.
    pub fn set_ground(&mut self, location: &Location, material: Material) {
        let below = location.block_pos().below();
        self.world_mut(location.world).set_block(below, material);
    }

    pub fn add_mob(&mut self, runtime_id: u64, mob: MobType, location: Location) {
        self.entities.push(NearbyEntity {
            runtime_id,
            kind: EntityKind::Mob(mob),
            location,
        });
    }
}

/// A location standing on flat terrain.
pub fn on_surface(world: WorldId, x: i32, z: i32) -> Location {
    Location::new(world, x as f64 + 0.5, SPAWN_Y as f64, z as f64 + 0.5)
}

pub fn spawned(runtime_id: u64, mob: MobType, location: Location) -> SpawnedMob {
    SpawnedMob {
        runtime_id,
        mob,
        location,
    }
}

impl ServerApi for MockServer {
    fn resolve_region(&self, location: &Location) -> Option<RegionCoords> {
        if Some(location.world) != self.managed {
            return None;
        }
        Some(self.grid.region_of(location))
    }

    fn region_center(&self, region: RegionCoords) -> Location {
        let (x, z) = self.grid.center_of(region);
        Location::new(self.managed.unwrap_or(OVERWORLD), x as f64, 0.0, z as f64)
    }

    fn open_region(&self) -> RegionCoords {
        self.open
    }

    fn managed_world(&self) -> Option<WorldId> {
        self.managed
    }

    fn dimension(&self, world: WorldId) -> Dimension {
        self.worlds[world.0 as usize].dimension()
    }

    fn block_at(&self, world: WorldId, pos: BlockPos) -> Material {
        self.block(world, pos)
    }

    fn highest_solid_y(&self, world: WorldId, x: i32, z: i32) -> i32 {
        self.worlds[world.0 as usize].highest_solid_y(x, z)
    }

    fn set_block(&mut self, world: WorldId, pos: BlockPos, material: Material) {
        self.writes.push((world, pos, material));
        self.world_mut(world).set_block(pos, material);
    }

    fn nearby_entities(
        &self,
        center: &Location,
        half_extents: (f64, f64, f64),
        exclude: Option<u64>,
    ) -> Vec<NearbyEntity> {
        let (hx, hy, hz) = half_extents;
        self.entities
            .iter()
            .filter(|e| Some(e.runtime_id) != exclude)
            .filter(|e| e.location.world == center.world)
            .filter(|e| {
                (e.location.x - center.x).abs() <= hx
                    && (e.location.y - center.y).abs() <= hy
                    && (e.location.z - center.z).abs() <= hz
            })
            .cloned()
            .collect()
    }

    fn spawn_mob(&mut self, mob: MobType, location: &Location) {
        self.spawned.push((mob, *location));
    }

    fn reset_idle_timer(&mut self, player: &PlayerRef) {
        self.idle_resets.push(player.clone());
    }
}
