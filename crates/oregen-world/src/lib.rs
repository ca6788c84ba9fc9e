//! Voxel positions, chunk coordinates, the grid interface, and biome filters.
#![forbid(unsafe_code)]

pub mod biome;
mod chunk_coord;
mod grid;
mod position;

pub use biome::{BiomeEntry, BiomeSpec};
pub use chunk_coord::{CHUNK_WIDTH, ChunkCoord};
pub use grid::{ChunkGrid, SetFlags, VoxelGrid};
pub use position::BlockPos;
