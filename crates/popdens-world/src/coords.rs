//! Block and entity coordinates.

use serde::{Deserialize, Serialize};

/// Host-assigned identifier of a loaded world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(pub u32);

/// The three dimension kinds a world can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Overworld,
    Nether,
    End,
}

/// Integer block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub const fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    pub const fn below(self) -> Self {
        self.offset(0, -1, 0)
    }
}

/// A point in a world, as carried by entities and events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: WorldId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(world: WorldId, x: f64, y: f64, z: f64) -> Self {
        Self { world, x, y, z }
    }

    /// Location of a block's minimum corner.
    pub fn of_block(world: WorldId, pos: BlockPos) -> Self {
        Self::new(world, pos.x as f64, pos.y as f64, pos.z as f64)
    }

    /// The block containing this point.
    pub fn block_pos(&self) -> BlockPos {
        BlockPos::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.z.floor() as i32,
        )
    }

    pub fn with_y(self, y: f64) -> Self {
        Self { y, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_pos_floors_negative_coordinates() {
        let loc = Location::new(WorldId(0), -0.5, 64.9, -17.01);
        assert_eq!(loc.block_pos(), BlockPos::new(-1, 64, -18));
    }

    #[test]
    fn above_below_offset() {
        let p = BlockPos::new(3, 10, -2);
        assert_eq!(p.above(), BlockPos::new(3, 11, -2));
        assert_eq!(p.below(), BlockPos::new(3, 9, -2));
        assert_eq!(p.offset(-1, 2, 1), BlockPos::new(2, 12, -1));
    }

    #[test]
    fn with_y_keeps_horizontal() {
        let loc = Location::new(WorldId(2), 1.5, 3.0, 4.5).with_y(70.0);
        assert_eq!(loc, Location::new(WorldId(2), 1.5, 70.0, 4.5));
    }
}
