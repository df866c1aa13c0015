//! alsgrid CLI - airborne laser-scanning point aggregation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use alsgrid_algorithms::change::raster_difference;
use alsgrid_algorithms::pointcloud::{
    estimate_density, rasterize_max, DensityEstimate, DensityMode, DensityParams, RasterizeParams,
};
use alsgrid_core::io::read_xyz;
use alsgrid_core::{ClassFilter, LasClass, PointSet, Raster, CRS, DEFAULT_NODATA};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "alsgrid")]
#[command(author, version, about = "Aggregate airborne laser-scanning point clouds", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show point count, bounds and class distribution of a point file
    Info {
        /// Input XYZ point file
        input: PathBuf,
    },
    /// Build a maximum-height surface raster
    Rasterize {
        /// Input XYZ point file
        input: PathBuf,
        /// Cell size in map units
        #[arg(short, long, default_value = "1.0")]
        cell_size: f64,
        /// Classes to keep: all, ground, surface, denoised, "2,6" or "!7,12"
        #[arg(long, default_value = "surface")]
        classes: ClassFilter,
        /// No-data value for empty cells
        #[arg(long, default_value_t = DEFAULT_NODATA, allow_negative_numbers = true)]
        nodata: f64,
        /// CRS recorded on the raster: EPSG:<code>, +proj definition or WKT
        #[arg(long, default_value = "EPSG:2180")]
        crs: CRS,
    },
    /// Estimate local point density and its population histogram
    Density {
        /// Input XYZ point file
        input: PathBuf,
        /// Neighborhood radius in map units
        #[arg(short, long, default_value = "1.0")]
        radius: f64,
        /// 2D (per square unit) or 3D (per cubic unit)
        #[arg(short, long, default_value = "2D")]
        mode: DensityMode,
        /// Sample every n-th point
        #[arg(short, long, default_value = "100")]
        stride: usize,
        /// Classes to keep before estimating (ground for terrain-only density)
        #[arg(long, default_value = "all")]
        classes: ClassFilter,
        /// Number of histogram bins
        #[arg(short, long, default_value = "500")]
        bins: usize,
    },
    /// Elevation change between two epochs (before - after)
    Diff {
        /// Earlier epoch XYZ point file
        before: PathBuf,
        /// Later epoch XYZ point file
        after: PathBuf,
        /// Cell size in map units
        #[arg(short, long, default_value = "1.0")]
        cell_size: f64,
        /// Classes rasterized in both epochs
        #[arg(long, default_value = "surface")]
        classes: ClassFilter,
        /// CRS recorded on the raster
        #[arg(long, default_value = "EPSG:2180")]
        crs: CRS,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn read_points(path: &PathBuf, classes: &ClassFilter) -> Result<PointSet> {
    let pb = spinner("Reading points...");
    let points = read_xyz(path).with_context(|| format!("Failed to read {}", path.display()))?;
    pb.finish_and_clear();

    if *classes != ClassFilter::All && !points.has_classification() {
        warn!(
            "{} carries no class codes, class filter {:?} not applied",
            path.display(),
            classes
        );
    }
    let filtered = points.filter_classified(classes);
    info!(
        "Input: {} points, {} after class filter",
        points.len(),
        filtered.len()
    );
    debug!("Class filter: {:?}", classes);
    Ok(filtered)
}

fn print_raster(name: &str, raster: &Raster) {
    let (rows, cols) = raster.shape();
    let (min_x, min_y, max_x, max_y) = raster.bounds();
    let stats = raster.statistics();

    println!("{}:", name);
    println!("  Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
    println!("  Cell size: {}", raster.cell_size());
    println!(
        "  Bounds: ({:.3}, {:.3}) - ({:.3}, {:.3})",
        min_x, min_y, max_x, max_y
    );
    println!("  GeoTransform: {:?}", raster.transform().to_gdal());
    if let Some(crs) = raster.crs() {
        println!("  CRS: {}", crs);
    }
    println!("  NoData: {}", raster.nodata());
    if let Some(min) = stats.min {
        println!("  Min: {:.3}", min);
    }
    if let Some(max) = stats.max {
        println!("  Max: {:.3}", max);
    }
    if let Some(mean) = stats.mean {
        println!("  Mean: {:.3}", mean);
    }
    println!(
        "  Valid cells: {} ({:.1}%)",
        stats.valid_count,
        100.0 * stats.valid_count as f64 / raster.len() as f64
    );
}

fn print_density(est: &DensityEstimate, bins: usize) -> Result<()> {
    let unit = est.mode.unit();
    println!(
        "Density ({}, radius {}): {} of {} points sampled, scaling factor {:.3}",
        est.mode, est.radius, est.sample_count, est.total_count, est.scaling_factor
    );
    println!("  Min: {:.3} {}", est.min(), unit);
    println!("  Max: {:.3} {}", est.max(), unit);
    println!("  Mean: {:.3} {}", est.mean(), unit);

    let hist = est
        .population_histogram(bins)
        .context("Failed to build density histogram")?;
    println!("\nPopulation histogram ({} bins, empty bins omitted):", hist.bins());
    for (lo, hi, count) in hist.iter().filter(|(_, _, c)| *c > 0.0) {
        println!("  [{:>10.3}, {:>10.3}) {:>12.0}", lo, hi, count);
    }
    Ok(())
}

fn done(name: &str, elapsed: std::time::Duration) {
    println!("{} finished", name);
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ── Info ─────────────────────────────────────────────────────
        Commands::Info { input } => {
            let points = read_points(&input, &ClassFilter::All)?;
            println!("File: {}", input.display());
            println!("Points: {}", points.len());
            if let Some(b) = points.bounds() {
                println!(
                    "Bounds: ({:.3}, {:.3}, {:.3}) - ({:.3}, {:.3}, {:.3})",
                    b.min_x, b.min_y, b.min_z, b.max_x, b.max_y, b.max_z
                );
            }
            println!("\nClasses:");
            for (code, count) in points.class_counts() {
                let label = match code.map(LasClass::from_code) {
                    Some(class) => class.to_string(),
                    None => "not recorded".to_string(),
                };
                println!("  {:<28} {:>12}", label, count);
            }
        }

        // ── Rasterize ────────────────────────────────────────────────
        Commands::Rasterize {
            input,
            cell_size,
            classes,
            nodata,
            crs,
        } => {
            let points = read_points(&input, &classes)?;
            let params = RasterizeParams {
                cell_size,
                nodata,
                crs: Some(crs),
                ..RasterizeParams::default()
            };
            let start = Instant::now();
            let raster = rasterize_max(&points, &params).context("Failed to rasterize points")?;
            let elapsed = start.elapsed();
            print_raster("Surface raster", &raster);
            done("Rasterization", elapsed);
        }

        // ── Density ──────────────────────────────────────────────────
        Commands::Density {
            input,
            radius,
            mode,
            stride,
            classes,
            bins,
        } => {
            let points = read_points(&input, &classes)?;
            let params = DensityParams {
                radius,
                mode,
                stride,
            };
            let pb = spinner("Counting neighbors...");
            let start = Instant::now();
            let est = estimate_density(&points, &params).context("Failed to estimate density")?;
            let elapsed = start.elapsed();
            pb.finish_and_clear();
            print_density(&est, bins)?;
            done("Density estimation", elapsed);
        }

        // ── Diff ─────────────────────────────────────────────────────
        Commands::Diff {
            before,
            after,
            cell_size,
            classes,
            crs,
        } => {
            let first = read_points(&before, &classes)?;
            let second = read_points(&after, &classes)?;

            // Both epochs go onto one grid covering either footprint
            let extent = match (first.bounds(), second.bounds()) {
                (Some(a), Some(b)) => a.extent().union(&b.extent()),
                _ => anyhow::bail!("Both epochs need at least one point after filtering"),
            };
            let params = RasterizeParams {
                cell_size,
                extent: Some(extent),
                crs: Some(crs),
                ..RasterizeParams::default()
            };

            let start = Instant::now();
            let a = rasterize_max(&first, &params).context("Failed to rasterize earlier epoch")?;
            let b = rasterize_max(&second, &params).context("Failed to rasterize later epoch")?;
            let diff = raster_difference(&a, &b).context("Failed to difference epochs")?;
            let elapsed = start.elapsed();
            print_raster("Difference raster (before - after)", &diff);
            done("Differencing", elapsed);
        }
    }

    Ok(())
}
