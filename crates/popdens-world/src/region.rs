//! Region partitioning of the horizontal plane.
//!
//! The managed world is cut into square regions. The middle of each region
//! holds its post, which is what the explosion rule protects.

use serde::{Deserialize, Serialize};

use crate::coords::Location;

/// Edge length of a region in blocks.
pub const DEFAULT_REGION_SIZE: i32 = 400;

/// Region coordinates (not block coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionCoords {
    pub x: i32,
    pub z: i32,
}

impl RegionCoords {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl std::fmt::Display for RegionCoords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Floor-division region math.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionGrid {
    pub size: i32,
}

impl Default for RegionGrid {
    fn default() -> Self {
        Self {
            size: DEFAULT_REGION_SIZE,
        }
    }
}

impl RegionGrid {
    pub fn new(size: i32) -> Self {
        debug_assert!(size > 0);
        Self { size }
    }

    pub fn region_of_block(&self, x: i32, z: i32) -> RegionCoords {
        RegionCoords::new(x.div_euclid(self.size), z.div_euclid(self.size))
    }

    pub fn region_of(&self, location: &Location) -> RegionCoords {
        self.region_of_block(location.x.floor() as i32, location.z.floor() as i32)
    }

    /// Block x/z of the region post.
    pub fn center_of(&self, region: RegionCoords) -> (i32, i32) {
        (
            region.x * self.size + self.size / 2,
            region.z * self.size + self.size / 2,
        )
    }
}
