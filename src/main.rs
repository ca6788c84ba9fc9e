mod region;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use hashbrown::HashMap;
use oregen_blocks::BlockRegistry;
use oregen_config::{ConfigStore, load_from_path, watch_config};
use oregen_runtime::Runtime;

use crate::region::{RegionSpec, fill_block};

#[derive(Parser, Debug)]
#[command(name = "oregen", about = "Generate ore veins into a region of synthetic chunks")]
struct Args {
    /// Block registry (blocks, block tags, biome tags).
    #[arg(long, default_value = "assets/registry.toml")]
    blocks: PathBuf,

    /// Ore configuration (ores, generators, replacements).
    #[arg(long, default_value = "assets/oregen.toml")]
    config: PathBuf,

    /// World seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Chunks generated in each direction from the origin chunk.
    #[arg(long, default_value_t = 2)]
    radius: i32,

    /// Chunk height in blocks.
    #[arg(long, default_value_t = 128)]
    height: usize,

    /// Lowest block y.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    min_y: i32,

    /// Biome ids assigned to chunks in turn. May be repeated.
    #[arg(long = "biome", default_value = "minecraft:plains")]
    biomes: Vec<String>,

    /// Worker threads; defaults to available parallelism.
    #[arg(long)]
    workers: Option<usize>,

    /// Regenerate the region whenever the ore config changes.
    #[arg(long)]
    watch: bool,
}

fn run_region(rt: &Runtime, reg: &BlockRegistry, region: &RegionSpec) -> Result<(), Box<dyn Error>> {
    let fill = fill_block(reg)?;
    let t0 = Instant::now();
    let results = rt.generate_all(region.build(fill));

    let mut failed = 0usize;
    let mut clusters = 0u64;
    let mut placed = 0u64;
    let mut config_rev = 0u64;
    let mut per_resource: HashMap<String, u64> = HashMap::new();
    let mut t_gen_ms = 0u64;
    for out in results.values() {
        config_rev = config_rev.max(out.config_rev);
        t_gen_ms += u64::from(out.t_gen_ms);
        match &out.result {
            Ok(report) => {
                clusters += u64::from(report.clusters_attempted);
                placed += u64::from(report.blocks_placed);
                for r in &report.resources {
                    *per_resource.entry(r.resource.clone()).or_insert(0) += u64::from(r.blocks_placed);
                }
            }
            Err(_) => failed += 1,
        }
    }

    log::info!(
        "generated {} chunks (config rev {}) in {} ms: {} clusters, {} blocks placed, {} failed, {} ms in workers",
        results.len(),
        config_rev,
        t0.elapsed().as_millis(),
        clusters,
        placed,
        failed,
        t_gen_ms
    );
    let mut names: Vec<_> = per_resource.into_iter().collect();
    names.sort();
    for (name, count) in names {
        log::info!("  {:<12} {}", name, count);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let reg = Arc::new(BlockRegistry::load_from_path(&args.blocks)?);
    log::info!("loaded {} blocks from {}", reg.len(), args.blocks.display());

    let parsed = load_from_path(&args.config)?;
    let store = Arc::new(ConfigStore::new(parsed.value));

    let rt = match args.workers {
        Some(n) => Runtime::with_workers(n, reg.clone(), store.clone(), args.seed)?,
        None => Runtime::new(reg.clone(), store.clone(), args.seed)?,
    };
    let region = RegionSpec {
        radius: args.radius,
        min_y: args.min_y,
        height: args.height,
        biomes: args.biomes.clone(),
    };
    log::info!(
        "seed {} | {} chunks | {} workers",
        args.seed,
        region.chunk_count(),
        rt.workers
    );

    run_region(&rt, &reg, &region)?;

    if args.watch {
        let watcher = watch_config(&args.config)?;
        loop {
            if watcher.wait_changed(Duration::from_millis(500)) && watcher.reload(&store) {
                run_region(&rt, &reg, &region)?;
            }
        }
    }
    Ok(())
}
