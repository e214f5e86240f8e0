//! Explosion suppression around region posts.
//!
//! Explosions within 15 blocks of a region post keep their sound, visuals,
//! and entity damage but destroy no terrain.

use popdens_plugin_api::ServerApi;
use popdens_world::spatial::squared_distance;
use popdens_world::{BlockPos, Location};
use tracing::debug;

/// Blocks around a region post that explosions may not break.
pub const POST_PROTECTION_RADIUS: f64 = 15.0;

const POST_PROTECTION_RADIUS_SQ: f64 = POST_PROTECTION_RADIUS * POST_PROTECTION_RADIUS;

/// Clear `blocks` if the explosion at `location` is near its region's post.
///
/// The post sits on the terrain surface at the region center; the surface
/// height is looked up on every call since terrain changes. Returns whether
/// the block list was cleared. Explosions outside the managed world are left
/// alone.
pub fn protect_region_post(
    location: &Location,
    blocks: &mut Vec<BlockPos>,
    api: &dyn ServerApi,
) -> bool {
    let Some(region) = api.resolve_region(location) else {
        return false;
    };

    let center = api.region_center(region);
    let surface_y = api.highest_solid_y(
        center.world,
        center.x.floor() as i32,
        center.z.floor() as i32,
    );
    let post = center.with_y(surface_y as f64);

    let dist_sq = squared_distance(&post, location);
    if dist_sq >= POST_PROTECTION_RADIUS_SQ {
        return false;
    }

    debug!(
        "Sparing {} blocks from explosion {:.1} blocks from post of region {}",
        blocks.len(),
        dist_sq.sqrt(),
        region
    );
    blocks.clear();
    true
}
