//! Chunk and sub-chunk storage for in-memory worlds.

use crate::material::Material;

/// Sub-chunks per column: Y range [-64, 319] = 384 blocks / 16 = 24.
pub const SUB_CHUNK_COUNT: usize = 24;

/// Minimum Y coordinate of a column.
pub const MIN_Y: i32 = -64;

/// One past the maximum Y coordinate of a column.
pub const MAX_Y: i32 = MIN_Y + (SUB_CHUNK_COUNT as i32) * 16;

/// A 16x16x16 section with a material palette.
#[derive(Clone)]
pub struct SubChunk {
    /// Palette indices for each block, stored in XZY order: `(x*16 + z)*16 + y`.
    pub blocks: [u16; 4096],
    pub palette: Vec<Material>,
}

impl SubChunk {
    /// Create a sub-chunk filled entirely with one material.
    pub fn new_single(material: Material) -> Self {
        Self {
            blocks: [0; 4096],
            palette: vec![material],
        }
    }

    /// `x`, `y`, `z` must each be in `[0, 15]`.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, material: Material) {
        debug_assert!(x < 16 && y < 16 && z < 16);
        let palette_index = match self.palette.iter().position(|&m| m == material) {
            Some(idx) => idx,
            None => {
                self.palette.push(material);
                self.palette.len() - 1
            }
        };
        self.blocks[(x * 16 + z) * 16 + y] = palette_index as u16;
    }

    pub fn get_block(&self, x: usize, y: usize, z: usize) -> Material {
        let palette_index = self.blocks[(x * 16 + z) * 16 + y] as usize;
        self.palette[palette_index]
    }
}

/// A full chunk column covering [`MIN_Y`, `MAX_Y`).
#[derive(Clone)]
pub struct ChunkColumn {
    pub x: i32,
    pub z: i32,
    pub sub_chunks: Vec<SubChunk>,
}

impl ChunkColumn {
    pub fn new_filled(x: i32, z: i32, material: Material) -> Self {
        Self {
            x,
            z,
            sub_chunks: vec![SubChunk::new_single(material); SUB_CHUNK_COUNT],
        }
    }

    /// Block at local x/z and world y. Outside the vertical range is air.
    pub fn get_block(&self, x: usize, y: i32, z: usize) -> Material {
        if !(MIN_Y..MAX_Y).contains(&y) {
            return Material::Air;
        }
        let (section, local_y) = split_y(y);
        self.sub_chunks[section].get_block(x, local_y, z)
    }

    /// Returns `false` if `y` is outside the column.
    pub fn set_block(&mut self, x: usize, y: i32, z: usize, material: Material) -> bool {
        if !(MIN_Y..MAX_Y).contains(&y) {
            return false;
        }
        let (section, local_y) = split_y(y);
        self.sub_chunks[section].set_block(x, local_y, z, material);
        true
    }

    /// Y of the topmost solid block at local x/z.
    pub fn highest_solid_y(&self, x: usize, z: usize) -> Option<i32> {
        (MIN_Y..MAX_Y)
            .rev()
            .find(|&y| self.get_block(x, y, z).is_solid())
    }
}

fn split_y(y: i32) -> (usize, usize) {
    let offset = (y - MIN_Y) as usize;
    (offset / 16, offset % 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_growth() {
        let mut sub = SubChunk::new_single(Material::Air);
        sub.set_block(0, 0, 0, Material::Stone);
        sub.set_block(0, 1, 0, Material::Dirt);
        assert_eq!(sub.palette.len(), 3);
        // Reusing a palette entry should not grow it.
        sub.set_block(0, 2, 0, Material::Stone);
        assert_eq!(sub.palette.len(), 3);
    }

    #[test]
    fn xzy_ordering() {
        let mut sub = SubChunk::new_single(Material::Air);
        sub.set_block(1, 2, 3, Material::Obsidian);
        // (x*16 + z)*16 + y = (1*16 + 3)*16 + 2 = 306
        let idx = sub.blocks[306] as usize;
        assert_eq!(sub.palette[idx], Material::Obsidian);
    }

    #[test]
    fn column_negative_y() {
        let mut col = ChunkColumn::new_filled(0, 0, Material::Air);
        assert!(col.set_block(4, -64, 4, Material::Bedrock));
        assert!(col.set_block(4, -1, 4, Material::Stone));
        assert_eq!(col.get_block(4, -64, 4), Material::Bedrock);
        assert_eq!(col.get_block(4, -1, 4), Material::Stone);
        assert_eq!(col.get_block(4, 0, 4), Material::Air);
    }

    #[test]
    fn column_out_of_range() {
        let mut col = ChunkColumn::new_filled(0, 0, Material::Stone);
        assert!(!col.set_block(0, MAX_Y, 0, Material::Dirt));
        assert_eq!(col.get_block(0, MAX_Y, 0), Material::Air);
        assert_eq!(col.get_block(0, MIN_Y - 1, 0), Material::Air);
    }

    #[test]
    fn highest_solid_skips_plants() {
        let mut col = ChunkColumn::new_filled(0, 0, Material::Air);
        col.set_block(0, 3, 0, Material::GrassBlock);
        col.set_block(0, 4, 0, Material::ShortGrass);
        assert_eq!(col.highest_solid_y(0, 0), Some(3));
        assert_eq!(col.highest_solid_y(1, 1), None);
    }
}
