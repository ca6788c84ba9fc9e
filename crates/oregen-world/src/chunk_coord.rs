use serde::{Deserialize, Serialize};

use crate::BlockPos;

/// Horizontal extent of a chunk column in blocks.
pub const CHUNK_WIDTH: i32 = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    /// Chunk column containing `pos`.
    #[inline]
    pub fn containing(pos: BlockPos) -> Self {
        Self {
            cx: pos.x.div_euclid(CHUNK_WIDTH),
            cz: pos.z.div_euclid(CHUNK_WIDTH),
        }
    }

    #[inline]
    pub fn start_x(self) -> i32 {
        self.cx * CHUNK_WIDTH
    }

    #[inline]
    pub fn start_z(self) -> i32 {
        self.cz * CHUNK_WIDTH
    }

    #[inline]
    pub fn contains_column(self, x: i32, z: i32) -> bool {
        ChunkCoord::containing(BlockPos::new(x, 0, z)) == self
    }
}
