//! Flat world generator.
//!
//! Column layout per dimension (Y = 4+ is air everywhere):
//! - Overworld: Y = 0 bedrock, Y = 1-2 dirt, Y = 3 grass block
//! - Nether: Y = 0 bedrock, Y = 1-3 netherrack
//! - End: Y = 0-3 end stone

use crate::chunk::ChunkColumn;
use crate::coords::Dimension;
use crate::grid::MemoryWorld;
use crate::material::Material;

/// Y of the top terrain layer in a flat world.
pub const FLAT_SURFACE_Y: i32 = 3;

fn layers(dimension: Dimension) -> [Material; 4] {
    match dimension {
        Dimension::Overworld => [
            Material::Bedrock,
            Material::Dirt,
            Material::Dirt,
            Material::GrassBlock,
        ],
        Dimension::Nether => [
            Material::Bedrock,
            Material::Netherrack,
            Material::Netherrack,
            Material::Netherrack,
        ],
        Dimension::End => [Material::EndStone; 4],
    }
}

/// Generate a flat chunk column at the given chunk coordinates.
pub fn generate_flat_chunk(x: i32, z: i32, dimension: Dimension) -> ChunkColumn {
    let mut col = ChunkColumn::new_filled(x, z, Material::Air);
    let layers = layers(dimension);
    for lx in 0..16 {
        for lz in 0..16 {
            for (y, material) in layers.iter().enumerate() {
                col.set_block(lx, y as i32, lz, *material);
            }
        }
    }
    col
}

/// Generate a square of flat chunks, `radius` chunks out from the origin.
pub fn generate_flat_world(dimension: Dimension, radius: i32) -> MemoryWorld {
    let mut world = MemoryWorld::new(dimension);
    for cx in -radius..=radius {
        for cz in -radius..=radius {
            world.insert_column(generate_flat_chunk(cx, cz, dimension));
        }
    }
    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::BlockPos;
    use crate::grid::BlockSource;

    #[test]
    fn overworld_layer_layout() {
        let col = generate_flat_chunk(0, 0, Dimension::Overworld);
        assert_eq!(col.get_block(0, 0, 0), Material::Bedrock);
        assert_eq!(col.get_block(0, 1, 0), Material::Dirt);
        assert_eq!(col.get_block(0, 2, 0), Material::Dirt);
        assert_eq!(col.get_block(0, 3, 0), Material::GrassBlock);
        assert_eq!(col.get_block(0, 4, 0), Material::Air);
        assert_eq!(col.get_block(0, -1, 0), Material::Air);
    }

    #[test]
    fn surface_per_dimension() {
        let nether = generate_flat_chunk(0, 0, Dimension::Nether);
        assert_eq!(nether.get_block(7, FLAT_SURFACE_Y, 7), Material::Netherrack);
        let end = generate_flat_chunk(0, 0, Dimension::End);
        assert_eq!(end.get_block(7, FLAT_SURFACE_Y, 7), Material::EndStone);
    }

    #[test]
    fn uniform_across_xz() {
        let col = generate_flat_chunk(5, -3, Dimension::Overworld);
        for x in 0..16 {
            for z in 0..16 {
                assert_eq!(col.get_block(x, 0, z), Material::Bedrock);
                assert_eq!(col.highest_solid_y(x, z), Some(FLAT_SURFACE_Y));
            }
        }
    }

    #[test]
    fn world_radius() {
        let world = generate_flat_world(Dimension::Overworld, 1);
        assert_eq!(world.column_count(), 9);
        assert_eq!(
            world.block_at(BlockPos::new(-16, FLAT_SURFACE_Y, 31)),
            Material::GrassBlock
        );
        assert_eq!(world.block_at(BlockPos::new(32, FLAT_SURFACE_Y, 0)), Material::Air);
    }
}
