//! Synthetic stone chunks used by the CLI driver.
use oregen_blocks::{Block, BlockRegistry, TagResolver};
use oregen_world::{ChunkCoord, ChunkGrid};

pub const FILL_BLOCK: &str = "minecraft:stone";

#[derive(Clone, Debug)]
pub struct RegionSpec {
    pub radius: i32,
    pub min_y: i32,
    pub height: usize,
    pub biomes: Vec<String>,
}

impl RegionSpec {
    #[inline]
    pub fn chunk_count(&self) -> usize {
        let side = (2 * self.radius.max(0) + 1) as usize;
        side * side
    }

    /// Biome for a chunk, cycling through the configured list.
    pub fn biome_for(&self, coord: ChunkCoord) -> Option<&str> {
        if self.biomes.is_empty() {
            return None;
        }
        let n = self.biomes.len() as i64;
        let i = (i64::from(coord.cx) * 31 + i64::from(coord.cz)).rem_euclid(n);
        Some(self.biomes[i as usize].as_str())
    }

    /// Stone-filled chunks centred on the origin chunk.
    pub fn build(&self, fill: Block) -> Vec<ChunkGrid> {
        let r = self.radius.max(0);
        let top = self.min_y + self.height as i32;
        let mut grids = Vec::with_capacity(self.chunk_count());
        for cz in -r..=r {
            for cx in -r..=r {
                let coord = ChunkCoord::new(cx, cz);
                let mut grid = ChunkGrid::filled(coord, self.min_y, self.height, top, fill);
                if let Some(biome) = self.biome_for(coord) {
                    grid.set_biome_all(biome);
                }
                grids.push(grid);
            }
        }
        grids
    }
}

pub fn fill_block(reg: &BlockRegistry) -> Result<Block, String> {
    reg.resolve_block(FILL_BLOCK)
        .ok_or_else(|| format!("registry does not define {FILL_BLOCK}"))
}
