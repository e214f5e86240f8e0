//! Spatial predicates over the block grid.
//!
//! These are hot-path helpers for the world rules: squared distances instead
//! of true distances, fixed-size neighbourhoods, and a bounded downward scan.

use crate::coords::{BlockPos, Location};
use crate::grid::{Block, BlockSource};

/// Squared Euclidean distance. Worlds are not compared.
pub fn squared_distance(a: &Location, b: &Location) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    dx * dx + dy * dy + dz * dz
}

/// The eight horizontally adjacent cells, cardinals first.
pub fn neighbors8(p: BlockPos) -> [BlockPos; 8] {
    [
        p.offset(1, 0, 0),   // east
        p.offset(-1, 0, 0),  // west
        p.offset(0, 0, -1),  // north
        p.offset(0, 0, 1),   // south
        p.offset(1, 0, -1),  // north-east
        p.offset(1, 0, 1),   // south-east
        p.offset(-1, 0, 1),  // south-west
        p.offset(-1, 0, -1), // north-west
    ]
}

/// Scan down from `start` through empty cells, looking at no more than
/// `max_drop` cells below it.
///
/// Returns the first non-empty cell, or `None` when every examined cell
/// (`start.y` down to `start.y - max_drop`) is empty.
pub fn find_support_surface(
    grid: &impl BlockSource,
    start: BlockPos,
    max_drop: u32,
) -> Option<Block> {
    let mut pos = start;
    for _ in 0..=max_drop {
        let material = grid.block_at(pos);
        if !material.is_empty() {
            return Some(Block { pos, material });
        }
        pos = pos.below();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::WorldId;
    use crate::grid::MemoryWorld;
    use crate::material::Material;
    use crate::Dimension;

    #[test]
    fn squared_distance_sums_axes() {
        let a = Location::new(WorldId(0), 0.0, 0.0, 0.0);
        let b = Location::new(WorldId(0), 3.0, 4.0, 12.0);
        assert_eq!(squared_distance(&a, &b), 169.0);
        assert_eq!(squared_distance(&b, &a), 169.0);
    }

    #[test]
    fn neighbors8_are_distinct_and_level() {
        let center = BlockPos::new(5, 70, -5);
        let n = neighbors8(center);
        for (i, p) in n.iter().enumerate() {
            assert_eq!(p.y, center.y);
            assert_ne!(*p, center);
            assert!((p.x - center.x).abs() <= 1 && (p.z - center.z).abs() <= 1);
            for q in &n[i + 1..] {
                assert_ne!(p, q);
            }
        }
    }

    #[test]
    fn support_surface_found_below() {
        let mut world = MemoryWorld::new(Dimension::Overworld);
        world.set_block(BlockPos::new(0, 60, 0), Material::GrassBlock);
        let found = find_support_surface(&world, BlockPos::new(0, 64, 0), 6).unwrap();
        assert_eq!(found.pos, BlockPos::new(0, 60, 0));
        assert_eq!(found.material, Material::GrassBlock);
    }

    #[test]
    fn support_surface_start_cell_counts() {
        let mut world = MemoryWorld::new(Dimension::Overworld);
        world.set_block(BlockPos::new(0, 64, 0), Material::Stone);
        let found = find_support_surface(&world, BlockPos::new(0, 64, 0), 0).unwrap();
        assert_eq!(found.material, Material::Stone);
    }

    #[test]
    fn support_surface_exhausts() {
        let mut world = MemoryWorld::new(Dimension::Overworld);
        // One cell beyond the scan range.
        world.set_block(BlockPos::new(0, 57, 0), Material::GrassBlock);
        assert!(find_support_surface(&world, BlockPos::new(0, 64, 0), 6).is_none());
        assert!(find_support_surface(&world, BlockPos::new(0, 64, 0), 7).is_some());
    }
}
