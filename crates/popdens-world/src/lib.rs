//! World model: materials, mobs, coordinates, regions, and block grids.

pub mod chunk;
pub mod coords;
pub mod flat_generator;
pub mod grid;
pub mod material;
pub mod mob;
pub mod region;
pub mod spatial;

pub use coords::{BlockPos, Dimension, Location, WorldId};
pub use grid::{Block, BlockSource, MemoryWorld};
pub use material::{Material, TreeSpecies};
pub use mob::{MobCategory, MobType};
pub use region::{RegionCoords, RegionGrid};
