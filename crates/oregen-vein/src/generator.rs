use oregen_blocks::{Block, TagResolver};
use oregen_config::{GenerationSettings, ReplacementRule, VoteConfig};
use oregen_world::{BlockPos, CHUNK_WIDTH, ChunkCoord, VoxelGrid};
use rand::Rng;
use thiserror::Error;

use crate::cache::ClumpCache;
use crate::replace::replace_block;

/// Largest radius picked from the cluster size alone; wider clumps would bleed
/// into neighbouring chunks.
pub const MAX_BASE_RADIUS: u32 = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("no biome at chunk origin {0:?}")]
    BiomeUnresolved(BlockPos),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceStats {
    pub resource: String,
    pub radius: u32,
    pub clusters: u32,
    pub blocks_placed: u32,
}

/// Outcome of one `generate` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub clusters_attempted: u32,
    pub blocks_placed: u32,
    pub resources: Vec<ResourceStats>,
    /// Active resources passed over (no settings, no candidates, or biome rejected).
    pub skipped: Vec<String>,
}

impl GenerateReport {
    /// True when at least one cluster was attempted, or there was nothing to do.
    pub fn attempted(&self) -> bool {
        self.clusters_attempted > 0 || (self.resources.is_empty() && self.skipped.is_empty())
    }
}

/// `min(MAX_BASE_RADIUS, floor(ln size) + 1)`.
pub fn base_radius(cluster_size: u32) -> u32 {
    let size = f64::from(cluster_size.max(1));
    let r = size.ln().floor() as u32 + 1;
    r.min(MAX_BASE_RADIUS)
}

/// Places ore veins into one chunk at a time.
pub struct VeinGenerator<'a, T: TagResolver + ?Sized> {
    tags: &'a T,
    cache: &'a ClumpCache,
}

impl<'a, T: TagResolver + ?Sized> VeinGenerator<'a, T> {
    pub fn new(tags: &'a T, cache: &'a ClumpCache) -> Self {
        Self { tags, cache }
    }

    /// Radius for a vein of `cluster_size` blocks: the smallest cached clump
    /// that can hold it, else the size-derived base radius.
    pub fn select_radius(&self, cluster_size: u32) -> u32 {
        let base = base_radius(cluster_size);
        self.cache
            .smallest_radius_holding(cluster_size.max(1) as usize)
            .unwrap_or(base)
    }

    /// Generates every active resource into the chunk containing `origin`.
    pub fn generate<G, R>(
        &self,
        grid: &mut G,
        config: &VoteConfig,
        origin: BlockPos,
        rng: &mut R,
    ) -> Result<GenerateReport, GenerateError>
    where
        G: VoxelGrid + ?Sized,
        R: Rng,
    {
        let mut report = GenerateReport::default();
        if config.is_empty() {
            return Ok(report);
        }

        let biome = grid
            .biome_at(origin)
            .ok_or(GenerateError::BiomeUnresolved(origin))?;
        let chunk = ChunkCoord::containing(origin);
        let height_bound = grid.chunk_height_bound(chunk);

        for resource in config.active() {
            let Some(settings) = config.settings(resource) else {
                log::debug!("{}: no generator settings", resource);
                report.skipped.push(resource.to_string());
                continue;
            };
            let candidates = self.candidates(settings);
            if candidates.is_empty() {
                log::debug!("{}: no resolvable ore blocks", resource);
                report.skipped.push(resource.to_string());
                continue;
            }
            if !settings.biomes.test(Some(biome.as_str()), self.tags) {
                report.skipped.push(resource.to_string());
                continue;
            }

            let stats = self.generate_resource(
                grid,
                chunk,
                height_bound,
                settings,
                config.rules(resource),
                &candidates,
                rng,
            );
            report.clusters_attempted += stats.clusters;
            report.blocks_placed += stats.blocks_placed;
            report.resources.push(stats);
        }
        Ok(report)
    }

    fn candidates(&self, settings: &GenerationSettings) -> Vec<Block> {
        settings
            .ores
            .iter()
            .filter_map(|id| self.tags.resolve_block(id))
            .filter(|b| !b.is_air())
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn generate_resource<G, R>(
        &self,
        grid: &mut G,
        chunk: ChunkCoord,
        height_bound: i32,
        settings: &GenerationSettings,
        rules: &[ReplacementRule],
        candidates: &[Block],
        rng: &mut R,
    ) -> ResourceStats
    where
        G: VoxelGrid + ?Sized,
        R: Rng,
    {
        let clusters = settings.effective_cluster_count();
        let size = settings.effective_cluster_size();
        let radius = self.select_radius(size);
        let mut stats = ResourceStats {
            resource: settings.resource.clone(),
            radius,
            ..Default::default()
        };
        for _ in 0..clusters {
            let center = epicenter(chunk, radius, settings, height_bound, rng);
            stats.clusters += 1;
            stats.blocks_placed +=
                self.place_vein(grid, center, size, radius, rules, candidates, rng);
        }
        log::debug!(
            "{} in {:?}: {} clusters, {} blocks, radius {}",
            stats.resource,
            chunk,
            stats.clusters,
            stats.blocks_placed,
            radius
        );
        stats
    }

    /// Gaussian-samples the clump for `radius` around `center` until `size`
    /// blocks are replaced or the clump runs out. Returns the number replaced.
    #[allow(clippy::too_many_arguments)]
    pub fn place_vein<G, R>(
        &self,
        grid: &mut G,
        center: BlockPos,
        size: u32,
        radius: u32,
        rules: &[ReplacementRule],
        candidates: &[Block],
        rng: &mut R,
    ) -> u32
    where
        G: VoxelGrid + ?Sized,
        R: Rng,
    {
        let mut draw = self.cache.get(radius);
        let mut placed = 0;
        while placed < size && !draw.is_empty() {
            let Some(pos) = draw.remove_gaussian(rng, center) else {
                continue;
            };
            if replace_block(grid, self.tags, pos, rules, candidates, rng) {
                placed += 1;
            }
        }
        placed
    }
}

/// Random vein centre: inset by `radius` from the chunk's horizontal edges,
/// within the settings' height band capped at `height_bound`.
fn epicenter<R: Rng>(
    chunk: ChunkCoord,
    radius: u32,
    settings: &GenerationSettings,
    height_bound: i32,
    rng: &mut R,
) -> BlockPos {
    let r = radius as i32;
    let span = (CHUNK_WIDTH - 2 * r).max(1);
    let x = rng.gen_range(0..span) + r;
    let z = rng.gen_range(0..span) + r;
    let (min_h, band) = settings.height_band_within(height_bound);
    let y = min_h + rng.gen_range(0..band);
    BlockPos::new(chunk.start_x() + x, y, chunk.start_z() + z)
}
