//! Sapling replanting and grass regrowth.

use popdens_plugin_api::ServerApi;
use popdens_world::spatial::{find_support_surface, neighbors8};
use popdens_world::{BlockPos, BlockSource, Location, Material, WorldId};
use tracing::debug;

use crate::config::RulesConfig;

/// Radius of the square regrown around natural spawns.
pub const GRASS_REGROW_RADIUS: i32 = 4;

/// Grass scans start this far above the center block.
const SCAN_START_ABOVE: i32 = 2;

/// Cells examined below the scan start; the lowest is four below center.
const SCAN_MAX_DROP: u32 = 6;

/// Read-only view of one world through the server API.
struct WorldBlocks<'a> {
    api: &'a dyn ServerApi,
    world: WorldId,
}

impl BlockSource for WorldBlocks<'_> {
    fn block_at(&self, pos: BlockPos) -> Material {
        self.api.block_at(self.world, pos)
    }
}

/// Plant a despawning sapling where it lies, in the open region only.
///
/// The sapling needs a free cell (air, short grass, or snow) over grass or
/// dirt, with no sapling or log in the eight cells around it. Returns the
/// planted position.
pub fn replant_sapling(
    item: Material,
    location: &Location,
    config: &RulesConfig,
    api: &mut dyn ServerApi,
) -> Option<BlockPos> {
    if !config.regrow_trees || !item.is_sapling() {
        return None;
    }

    if api.resolve_region(location) != Some(api.open_region()) {
        return None;
    }

    let world = location.world;
    let pos = location.block_pos();
    if !api.block_at(world, pos).is_plantable_cell() {
        return None;
    }

    let crowded = neighbors8(pos).into_iter().any(|n| {
        let m = api.block_at(world, n);
        m.is_sapling() || m.is_log()
    });
    if crowded {
        return None;
    }

    if !api.block_at(world, pos.below()).is_plantable_footing() {
        return None;
    }

    debug!("Replanting {} at {:?}", item, pos);
    api.set_block(world, pos, item);
    Some(pos)
}

/// Grow short grass on bare grass blocks in a square around `center`.
///
/// Each column is scanned downward from two above `center` to four below it;
/// only a grass block with air directly above gets short grass. Returns the
/// number of cells changed.
pub fn regrow_grass(
    world: WorldId,
    center: BlockPos,
    radius: i32,
    api: &mut dyn ServerApi,
) -> usize {
    let targets: Vec<BlockPos> = {
        let blocks = WorldBlocks { api: &*api, world };
        let mut targets = Vec::new();
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let start = center.offset(dx, SCAN_START_ABOVE, dz);
                let Some(surface) = find_support_surface(&blocks, start, SCAN_MAX_DROP) else {
                    continue;
                };
                if surface.material != Material::GrassBlock {
                    continue;
                }
                let above = surface.pos.above();
                if blocks.block_at(above).is_empty() {
                    targets.push(above);
                }
            }
        }
        targets
    };

    for pos in &targets {
        api.set_block(world, *pos, Material::ShortGrass);
    }
    if !targets.is_empty() {
        debug!("Regrew {} grass around {:?}", targets.len(), center);
    }
    targets.len()
}
