use oregen_blocks::Block;

use crate::{BlockPos, CHUNK_WIDTH, ChunkCoord};

/// Update flags forwarded to the host on writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SetFlags(pub u8);

impl SetFlags {
    pub const NONE: SetFlags = SetFlags(0);
    pub const NOTIFY_NEIGHBORS: SetFlags = SetFlags(1);
    pub const SYNC_LISTENERS: SetFlags = SetFlags(2);
    pub const DEFAULT: SetFlags = SetFlags(Self::NOTIFY_NEIGHBORS.0 | Self::SYNC_LISTENERS.0);

    #[inline]
    pub fn contains(self, other: SetFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Voxel storage the generator reads and writes. One implementation instance
/// is owned by a single generation task, so no internal locking is expected.
pub trait VoxelGrid {
    /// `None` outside the region this grid can serve.
    fn block_at(&self, pos: BlockPos) -> Option<Block>;

    /// Writes outside the served region are ignored.
    fn set_block(&mut self, pos: BlockPos, block: Block, flags: SetFlags);

    fn biome_at(&self, pos: BlockPos) -> Option<String>;

    /// Exclusive upper y bound of generated terrain in `chunk`.
    fn chunk_height_bound(&self, chunk: ChunkCoord) -> i32;
}

/// A single chunk column held in memory.
#[derive(Clone, Debug)]
pub struct ChunkGrid {
    pub coord: ChunkCoord,
    pub min_y: i32,
    pub sy: usize,
    pub blocks: Vec<Block>,
    // One entry per (x, z) column
    pub biomes: Vec<Option<String>>,
    pub writes: usize,
}

const SX: usize = CHUNK_WIDTH as usize;
const SZ: usize = CHUNK_WIDTH as usize;

impl ChunkGrid {
    pub fn new(coord: ChunkCoord, min_y: i32, sy: usize) -> Self {
        Self {
            coord,
            min_y,
            sy,
            blocks: vec![Block::AIR; SX * sy * SZ],
            biomes: vec![None; SX * SZ],
            writes: 0,
        }
    }

    /// Fills every column from `min_y` up to (excluding) `top` with `block`.
    pub fn filled(coord: ChunkCoord, min_y: i32, sy: usize, top: i32, block: Block) -> Self {
        let mut grid = Self::new(coord, min_y, sy);
        for ly in 0..sy {
            if min_y + ly as i32 >= top {
                break;
            }
            for lz in 0..SZ {
                for lx in 0..SX {
                    let i = grid.idx(lx, ly, lz);
                    grid.blocks[i] = block;
                }
            }
        }
        grid
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * SZ + z) * SX + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[self.idx(x, y, z)]
    }

    fn local(&self, pos: BlockPos) -> Option<(usize, usize, usize)> {
        if !self.contains_world(pos) {
            return None;
        }
        let lx = (pos.x - self.coord.start_x()) as usize;
        let ly = (pos.y - self.min_y) as usize;
        let lz = (pos.z - self.coord.start_z()) as usize;
        Some((lx, ly, lz))
    }

    #[inline]
    pub fn contains_world(&self, pos: BlockPos) -> bool {
        if pos.y < self.min_y || pos.y >= self.min_y + self.sy as i32 {
            return false;
        }
        self.coord.contains_column(pos.x, pos.z)
    }

    pub fn set_biome_all(&mut self, biome: &str) {
        for b in self.biomes.iter_mut() {
            *b = Some(biome.to_string());
        }
    }

    pub fn set_biome_column(&mut self, x: usize, z: usize, biome: Option<&str>) {
        if x < SX && z < SZ {
            self.biomes[z * SX + x] = biome.map(str::to_string);
        }
    }

    /// Number of blocks equal to `block`, ignoring state.
    pub fn count_id(&self, block: Block) -> usize {
        self.blocks.iter().filter(|b| b.id == block.id).count()
    }

    /// World positions of all blocks with the given id.
    pub fn positions_of(&self, block: Block) -> Vec<BlockPos> {
        let mut out = Vec::new();
        for ly in 0..self.sy {
            for lz in 0..SZ {
                for lx in 0..SX {
                    if self.get_local(lx, ly, lz).id == block.id {
                        out.push(BlockPos::new(
                            self.coord.start_x() + lx as i32,
                            self.min_y + ly as i32,
                            self.coord.start_z() + lz as i32,
                        ));
                    }
                }
            }
        }
        out
    }
}

impl VoxelGrid for ChunkGrid {
    fn block_at(&self, pos: BlockPos) -> Option<Block> {
        let (lx, ly, lz) = self.local(pos)?;
        Some(self.get_local(lx, ly, lz))
    }

    fn set_block(&mut self, pos: BlockPos, block: Block, _flags: SetFlags) {
        if let Some((lx, ly, lz)) = self.local(pos) {
            let i = self.idx(lx, ly, lz);
            self.blocks[i] = block;
            self.writes += 1;
        }
    }

    fn biome_at(&self, pos: BlockPos) -> Option<String> {
        let lx = (pos.x - self.coord.start_x()).clamp(0, CHUNK_WIDTH - 1) as usize;
        let lz = (pos.z - self.coord.start_z()).clamp(0, CHUNK_WIDTH - 1) as usize;
        self.biomes[lz * SX + lx].clone()
    }

    fn chunk_height_bound(&self, _chunk: ChunkCoord) -> i32 {
        self.min_y + self.sy as i32
    }
}
