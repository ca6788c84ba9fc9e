//! Worker pool that runs ore generation over many chunks.
#![forbid(unsafe_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use hashbrown::{HashMap, HashSet};
use oregen_blocks::BlockRegistry;
use oregen_config::ConfigStore;
use oregen_vein::{ClumpCache, GenerateError, GenerateReport, VeinGenerator};
use oregen_world::{BlockPos, ChunkCoord, ChunkGrid};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

struct GenJob {
    job_id: u64,
    grid: ChunkGrid,
}

pub struct JobOut {
    pub job_id: u64,
    pub coord: ChunkCoord,
    pub grid: ChunkGrid,
    pub result: Result<GenerateReport, GenerateError>,
    /// Revision of the config snapshot the job ran against.
    pub config_rev: u64,
    pub t_gen_ms: u32,
}

/// Per-chunk RNG seed; the same world seed and chunk always give the same stream.
pub fn chunk_seed(world_seed: u64, coord: ChunkCoord) -> u64 {
    let x = (coord.cx as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let z = (coord.cz as i64 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    world_seed ^ x.rotate_left(17) ^ z
}

/// Point handed to the generator for a chunk: its minimum corner.
#[inline]
pub fn chunk_origin(grid: &ChunkGrid) -> BlockPos {
    BlockPos::new(grid.coord.start_x(), grid.min_y, grid.coord.start_z())
}

fn process_gen_job(
    job: GenJob,
    reg: &BlockRegistry,
    store: &ConfigStore,
    cache: &ClumpCache,
    world_seed: u64,
    tx: &Sender<JobOut>,
) {
    let GenJob { job_id, mut grid } = job;
    let coord = grid.coord;
    // One snapshot per chunk; reloads land between chunks, never inside one.
    let (config_rev, config) = store.current();

    let t0 = Instant::now();
    let mut rng = ChaCha8Rng::seed_from_u64(chunk_seed(world_seed, coord));
    let origin = chunk_origin(&grid);
    let result = VeinGenerator::new(reg, cache).generate(&mut grid, &config, origin, &mut rng);
    let t_gen_ms = t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;

    if let Err(e) = &result {
        log::warn!("chunk {:?}: {}", coord, e);
    }
    let _ = tx.send(JobOut {
        job_id,
        coord,
        grid,
        result,
        config_rev,
        t_gen_ms,
    });
}

pub struct Runtime {
    job_tx: Sender<GenJob>,
    res_rx: Receiver<JobOut>,
    // Results received by `generate_all` for jobs it did not submit.
    stash: Mutex<VecDeque<JobOut>>,
    next_job: AtomicU64,
    _pool: Arc<ThreadPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    pub workers: usize,
}

impl Runtime {
    pub fn new(
        reg: Arc<BlockRegistry>,
        store: Arc<ConfigStore>,
        world_seed: u64,
    ) -> Result<Self, ThreadPoolBuildError> {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(8);
        Self::with_workers(workers, reg, store, world_seed)
    }

    pub fn with_workers(
        workers: usize,
        reg: Arc<BlockRegistry>,
        store: Arc<ConfigStore>,
        world_seed: u64,
    ) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<GenJob>();
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("oregen-gen-{i}"))
                .build()?,
        );
        let cache = ClumpCache::shared();
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let reg = reg.clone();
            let store = store.clone();
            let queued = queued.clone();
            let inflight = inflight.clone();
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_gen_job(job, reg.as_ref(), store.as_ref(), cache, world_seed, &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }
        log::debug!("oregen runtime started with {} workers", workers);

        Ok(Self {
            job_tx,
            res_rx,
            stash: Mutex::new(VecDeque::new()),
            next_job: AtomicU64::new(0),
            _pool: pool,
            queued,
            inflight,
            workers,
        })
    }

    /// Queues `grid` for generation. Returns the job id its `JobOut` will carry.
    pub fn submit(&self, grid: ChunkGrid) -> u64 {
        let job_id = self.next_job.fetch_add(1, Ordering::Relaxed);
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(GenJob { job_id, grid }).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
        }
        job_id
    }

    fn stash(&self) -> MutexGuard<'_, VecDeque<JobOut>> {
        match self.stash.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Next finished job from `submit`, in completion order.
    pub fn recv_result(&self, timeout: Duration) -> Option<JobOut> {
        if let Some(out) = self.stash().pop_front() {
            return Some(out);
        }
        match self.res_rx.recv_timeout(timeout) {
            Ok(out) => Some(out),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Submits every grid and blocks until each has come back, keyed by chunk.
    /// A later grid for the same chunk replaces an earlier one's result.
    /// Results of jobs queued through `submit` are left for `recv_result`.
    pub fn generate_all(&self, grids: impl IntoIterator<Item = ChunkGrid>) -> HashMap<ChunkCoord, JobOut> {
        let mut pending: HashSet<u64> = grids.into_iter().map(|grid| self.submit(grid)).collect();
        let mut done: HashMap<u64, JobOut> = HashMap::with_capacity(pending.len());
        while !pending.is_empty() {
            match self.res_rx.recv() {
                Ok(res) if pending.remove(&res.job_id) => {
                    done.insert(res.job_id, res);
                }
                Ok(res) => self.stash().push_back(res),
                Err(_) => break,
            }
        }
        // Completion order is arbitrary; submission order decides duplicates.
        let mut ids: Vec<u64> = done.keys().copied().collect();
        ids.sort_unstable();
        let mut out = HashMap::with_capacity(ids.len());
        for id in ids {
            if let Some(res) = done.remove(&id) {
                out.insert(res.coord, res);
            }
        }
        out
    }

    /// `(queued, inflight)`
    pub fn queue_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_seeds_differ_between_neighbours() {
        let a = chunk_seed(42, ChunkCoord::new(0, 0));
        let b = chunk_seed(42, ChunkCoord::new(1, 0));
        let c = chunk_seed(42, ChunkCoord::new(0, 1));
        let d = chunk_seed(43, ChunkCoord::new(0, 0));
        assert!(a != b && a != c && b != c && a != d);
        assert_eq!(a, chunk_seed(42, ChunkCoord::new(0, 0)));
    }

    #[test]
    fn origin_is_min_corner() {
        let grid = ChunkGrid::new(ChunkCoord::new(-2, 3), -64, 8);
        assert_eq!(chunk_origin(&grid), BlockPos::new(-32, -64, 48));
    }
}
