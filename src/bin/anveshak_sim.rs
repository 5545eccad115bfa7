//! Frontier exploration in a simulated world.
//!
//! Drives a [`SimulatedRobot`] through an ASCII world until no frontier is
//! left, optionally drawing the map after every cycle.
//!
//! Usage:
//!   cargo run --bin anveshak-sim                      # built-in two-room world
//!   cargo run --bin anveshak-sim -- --display
//!   cargo run --bin anveshak-sim -- --world maze.txt --start 1.25 1.25 0
//!   RUST_LOG=anveshak=debug cargo run --bin anveshak-sim -- --config anveshak.toml

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use anveshak::sim::{DEMO_RESOLUTION, DEMO_WORLD, SimConfig, SimulatedRobot, WorldMap, demo_start};
use anveshak::{
    AnveshakConfig, AnveshakError, AsciiDisplay, Explorer, GridConfig, Pose2D, Result, WorldPoint,
};

/// Explore a simulated world and report the result
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ASCII world file ('#' = wall); defaults to the built-in demo world
    #[arg(short, long)]
    world: Option<PathBuf>,

    /// World cell size in meters
    #[arg(long, default_value_t = DEMO_RESOLUTION)]
    resolution: f32,

    /// Start pose: x y theta
    #[arg(long, num_args = 3, value_names = ["X", "Y", "THETA"], allow_negative_numbers = true)]
    start: Option<Vec<f32>>,

    /// Grid bounds: x_min x_max y_min y_max (defaults to the world extent)
    #[arg(long, num_args = 4, value_names = ["X_MIN", "X_MAX", "Y_MIN", "Y_MAX"], allow_negative_numbers = true)]
    bounds: Option<Vec<f32>>,

    /// Stop after this many cycles (0 = no limit)
    #[arg(long)]
    max_cycles: Option<usize>,

    /// Seed for recovery and sensor noise (0 = random)
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Uniform range noise amplitude in meters
    #[arg(long, default_value_t = 0.0)]
    noise: f32,

    /// Draw the map to stdout every cycle
    #[arg(short, long)]
    display: bool,

    /// Write the final report as TOML
    #[arg(short, long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("anveshak=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    tracing::info!("anveshak-sim v{}", env!("CARGO_PKG_VERSION"));

    let (world, start) = load_world(&args)?;
    let config = build_config(&args, &world)?;

    let (x_min, x_max, y_min, y_max) = world.bounds();
    tracing::info!(
        "World {}x{} cells ({:.1} x {:.1} m), start ({:.2}, {:.2}, {:.2})",
        world.width(),
        world.height(),
        x_max - x_min,
        y_max - y_min,
        start.x,
        start.y,
        start.theta
    );

    let sim = SimConfig {
        max_range: config.sensor.max_range,
        range_noise: args.noise,
        seed: args.seed,
        ..SimConfig::default()
    };
    let mut robot = SimulatedRobot::new(world, start, sim);

    let mut explorer = Explorer::new(&config)?;
    if args.display {
        explorer = explorer.with_display(Box::new(AsciiDisplay::stdout()));
    }

    let report = explorer.run(&mut robot);
    tracing::info!(
        "{:?}: {} cycles, {} goals, {} aborts, {} collisions, {:.0} s simulated",
        report.status,
        report.cycles,
        report.goals_reached,
        report.aborts,
        robot.collisions(),
        robot.elapsed().as_secs_f32()
    );

    if let Some(path) = &args.report {
        let text = toml::to_string_pretty(&report)
            .map_err(|e| AnveshakError::Config(format!("Failed to serialize report: {}", e)))?;
        fs::write(path, text)?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(())
}

fn load_world(args: &Args) -> Result<(WorldMap, Pose2D)> {
    let Some(path) = &args.world else {
        let world = WorldMap::from_ascii(DEMO_WORLD, DEMO_RESOLUTION, WorldPoint::ZERO)?;
        let start = args.start.as_deref().map_or_else(demo_start, pose_from);
        return Ok((world, start));
    };

    let text = fs::read_to_string(path)?;
    let world = WorldMap::from_ascii(&text, args.resolution, WorldPoint::ZERO)?;
    let start = args
        .start
        .as_deref()
        .map(pose_from)
        .ok_or_else(|| AnveshakError::Config("--start is required with --world".into()))?;
    Ok((world, start))
}

fn pose_from(values: &[f32]) -> Pose2D {
    match values {
        [x, y, theta] => Pose2D::new(*x, *y, *theta),
        _ => Pose2D::identity(),
    }
}

fn build_config(args: &Args, world: &WorldMap) -> Result<AnveshakConfig> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            AnveshakConfig::load(path)?
        }
        None => {
            let (x_min, x_max, y_min, y_max) = world.bounds();
            AnveshakConfig {
                grid: GridConfig::with_bounds(x_min, x_max, y_min, y_max),
                ..AnveshakConfig::default()
            }
        }
    };

    if let Some(&[x_min, x_max, y_min, y_max]) = args.bounds.as_deref() {
        config.grid = GridConfig {
            x_min,
            x_max,
            y_min,
            y_max,
            ..config.grid
        };
    }
    if let Some(max_cycles) = args.max_cycles {
        config.exploration.max_cycles = max_cycles;
    }
    if args.seed != 0 {
        config.recovery.seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}
