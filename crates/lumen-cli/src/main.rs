//! lumen CLI - acceleration structure benchmarking
//!
//! Builds BVHs over random scenes and reports build shape, query throughput
//! and agreement with a linear scan.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use lumen_accel::{Accel, Backend, BvhConfig, Hittable, LeafLayout, PrimitiveList, TraversalStats};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

mod logger;
mod scene;

use logger::LogLevel;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Build and query ray tracing acceleration structures", long_about = None)]
struct Cli {
    /// Set the logging level
    #[arg(long, value_enum, default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Time BVH construction and traversal on a random sphere scene
    Bench {
        /// BVH configuration file (TOML); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the configured backend
        #[arg(long, value_parser = parse_backend)]
        backend: Option<Backend>,
        /// Number of spheres
        #[arg(short = 'n', long, default_value = "10000")]
        count: usize,
        /// Number of rays
        #[arg(short, long, default_value = "100000")]
        rays: usize,
        /// Sphere radius
        #[arg(long, default_value = "1.0")]
        radius: f64,
        /// Half the side length of the cube holding sphere centers
        #[arg(long, default_value = "50.0")]
        extent: f64,
        /// RNG seed for the scene and rays
        #[arg(short, long, default_value = "1")]
        seed: u64,
        /// Skip the linear-scan comparison
        #[arg(long)]
        no_verify: bool,
    },
    /// Validate a BVH configuration file
    Check {
        /// Path to the configuration file
        config: PathBuf,
    },
}

fn parse_backend(s: &str) -> std::result::Result<Backend, String> {
    match s.to_ascii_lowercase().as_str() {
        "tree" => Ok(Backend::Tree),
        "flat" => Ok(Backend::Flat),
        other => Err(format!("unknown backend '{other}' (expected tree or flat)")),
    }
}

struct BenchArgs {
    count: usize,
    rays: usize,
    radius: f64,
    extent: f64,
    seed: u64,
    verify: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.log_level);

    match cli.command {
        Commands::Bench {
            config,
            backend,
            count,
            rays,
            radius,
            extent,
            seed,
            no_verify,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(backend) = backend {
                config.backend = backend;
            }
            let args = BenchArgs {
                count,
                rays,
                radius,
                extent,
                seed,
                verify: !no_verify,
            };
            run_bench(&config, &args)?;
        }
        Commands::Check { config } => {
            let config = BvhConfig::load(&config)
                .with_context(|| format!("invalid configuration {}", config.display()))?;
            println!("{}", describe(&config));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<BvhConfig> {
    match path {
        Some(path) => {
            let config = BvhConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            debug!("loaded {:?} from {}", config, path.display());
            Ok(config)
        }
        None => Ok(BvhConfig::default()),
    }
}

fn describe(config: &BvhConfig) -> String {
    let backend = match config.backend {
        Backend::Tree => "tree",
        Backend::Flat => "flat",
    };
    match config.leaf_layout {
        LeafLayout::Binary => format!("backend = {backend}, binary leaves"),
        LeafLayout::Packed => format!(
            "backend = {backend}, packed leaves of up to {}",
            config.leaf_capacity
        ),
    }
}

fn run_bench(config: &BvhConfig, args: &BenchArgs) -> Result<()> {
    if args.count == 0 {
        anyhow::bail!("--count must be at least 1");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let spheres = scene::random_spheres(&mut rng, args.count, args.extent, args.radius);
    let rays = scene::camera_rays(&mut rng, args.rays, args.extent);
    info!(
        "scene: {} spheres, {} rays, seed {}",
        args.count, args.rays, args.seed
    );

    let start = Instant::now();
    let accel = Accel::build(spheres, config).context("BVH build failed")?;
    let build_time = start.elapsed();

    let stats = accel.stats();
    println!("{}", describe(config));
    println!(
        "build: {:.2?} ({} nodes, {} leaves, depth {})",
        build_time, stats.node_count, stats.leaf_count, stats.depth
    );

    let start = Instant::now();
    let results: Vec<_> = rays
        .par_iter()
        .map(|ray| {
            let mut work = TraversalStats::default();
            let hit = accel.hit_with_stats(ray, 0.001, f64::INFINITY, &mut work);
            (hit, work)
        })
        .collect();
    let query_time = start.elapsed();

    let mut total = TraversalStats::default();
    let mut hits = 0usize;
    for (hit, work) in &results {
        total += *work;
        if hit.is_some() {
            hits += 1;
        }
    }

    let per_ray = |n: usize| n as f64 / rays.len().max(1) as f64;
    let mrays = rays.len() as f64 / query_time.as_secs_f64().max(f64::EPSILON) / 1e6;
    println!(
        "query: {:.2?} ({:.2} Mrays/s), {} of {} rays hit",
        query_time,
        mrays,
        hits,
        rays.len()
    );
    println!(
        "per ray: {:.1} nodes visited, {:.1} primitives tested (of {})",
        per_ray(total.nodes_visited),
        per_ray(total.primitives_tested),
        stats.primitive_count
    );

    if args.verify {
        verify(&accel, &rays, &results)?;
    }

    Ok(())
}

/// Compare every hit against a linear scan of the same primitives.
fn verify(
    accel: &Accel<lumen_accel::Sphere>,
    rays: &[lumen_accel::Ray],
    results: &[(Option<lumen_accel::HitRecord>, TraversalStats)],
) -> Result<()> {
    let list: PrimitiveList = accel.primitives().iter().cloned().collect();

    let start = Instant::now();
    let mismatches = rays
        .par_iter()
        .zip(results.par_iter())
        .filter(|(ray, (hit, _))| list.hit(ray, 0.001, f64::INFINITY) != *hit)
        .count();
    info!("linear scan took {:.2?}", start.elapsed());

    if mismatches > 0 {
        anyhow::bail!("{} of {} rays disagree with the linear scan", mismatches, rays.len());
    }
    println!("verify: all {} rays match the linear scan", rays.len());
    Ok(())
}
