//! Block grid access.

use std::collections::HashMap;

use crate::chunk::{ChunkColumn, MIN_Y};
use crate::coords::{BlockPos, Dimension};
use crate::material::Material;

/// A typed cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub pos: BlockPos,
    pub material: Material,
}

/// Read access to one world's blocks.
pub trait BlockSource {
    fn block_at(&self, pos: BlockPos) -> Material;
}

impl<T: BlockSource + ?Sized> BlockSource for &T {
    fn block_at(&self, pos: BlockPos) -> Material {
        (**self).block_at(pos)
    }
}

/// Chunked in-memory world. Unloaded chunks read as air.
pub struct MemoryWorld {
    dimension: Dimension,
    columns: HashMap<(i32, i32), ChunkColumn>,
}

impl MemoryWorld {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            columns: HashMap::new(),
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn insert_column(&mut self, column: ChunkColumn) {
        self.columns.insert((column.x, column.z), column);
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Set a block, creating an air column if the chunk is not loaded.
    /// Returns `false` if `y` is outside the world height.
    pub fn set_block(&mut self, pos: BlockPos, material: Material) -> bool {
        let (cx, cz, lx, lz) = split_xz(pos.x, pos.z);
        self.columns
            .entry((cx, cz))
            .or_insert_with(|| ChunkColumn::new_filled(cx, cz, Material::Air))
            .set_block(lx, pos.y, lz, material)
    }

    /// Y of the topmost solid block, or the world floor if the column is empty.
    pub fn highest_solid_y(&self, x: i32, z: i32) -> i32 {
        let (cx, cz, lx, lz) = split_xz(x, z);
        self.columns
            .get(&(cx, cz))
            .and_then(|col| col.highest_solid_y(lx, lz))
            .unwrap_or(MIN_Y)
    }
}

impl BlockSource for MemoryWorld {
    fn block_at(&self, pos: BlockPos) -> Material {
        let (cx, cz, lx, lz) = split_xz(pos.x, pos.z);
        match self.columns.get(&(cx, cz)) {
            Some(col) => col.get_block(lx, pos.y, lz),
            None => Material::Air,
        }
    }
}

/// Split world x/z into chunk coordinates and local offsets.
fn split_xz(x: i32, z: i32) -> (i32, i32, usize, usize) {
    (
        x.div_euclid(16),
        z.div_euclid(16),
        x.rem_euclid(16) as usize,
        z.rem_euclid(16) as usize,
    )
}
