use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{ensure, Result};
use clap::{Parser, Subcommand};

use smart_traffic::simulation::{
    allocate_green_times, open_log_location, AdaptiveRunner, Direction, SimWorld, VehicleCounts,
};

#[derive(Parser)]
#[command(name = "smart_traffic")]
#[command(about = "Smart traffic light control simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the fixed-cycle intersection simulation headless
    Fixed {
        /// Number of simulation ticks to run
        #[arg(long, default_value = "600")]
        ticks: u32,

        /// Time delta per tick in seconds
        #[arg(long, default_value = "0.1")]
        delta: f32,

        /// Seed for reproducible spawning
        #[arg(long)]
        seed: Option<u64>,

        /// Durable log file path
        #[arg(long, default_value = "traffic_log.txt")]
        log: PathBuf,
    },
    /// Run one adaptive green-time cycle from per-direction vehicle counts
    Adaptive {
        /// Vehicle count for the North approach
        #[arg(long)]
        north: String,

        /// Vehicle count for the East approach
        #[arg(long)]
        east: String,

        /// Vehicle count for the South approach
        #[arg(long)]
        south: String,

        /// Vehicle count for the West approach
        #[arg(long)]
        west: String,

        /// Directory for the per-run log files
        #[arg(long, default_value = ".")]
        log_dir: PathBuf,

        /// Simulated-to-real time ratio (1.0 = real time)
        #[arg(long, default_value = "1.0")]
        time_scale: f32,

        /// Open the log directory in the OS file browser when done
        #[arg(long)]
        open_logs: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Fixed {
            ticks,
            delta,
            seed,
            log,
        } => run_fixed(ticks, delta, seed, &log),
        Command::Adaptive {
            north,
            east,
            south,
            west,
            log_dir,
            time_scale,
            open_logs,
        } => run_adaptive(&north, &east, &south, &west, &log_dir, time_scale, open_logs),
    }
}

/// Drive the fixed-cycle world headless, printing a summary once per
/// simulated second
fn run_fixed(ticks: u32, delta: f32, seed: Option<u64>, log: &Path) -> Result<()> {
    println!("Running fixed-cycle simulation...");
    println!("Ticks: {}, Delta: {}s, Log: {}", ticks, delta, log.display());
    println!();

    let mut world = match seed {
        Some(seed) => SimWorld::new_fixed_with_seed(seed),
        None => SimWorld::new_fixed(),
    };
    world.attach_log_file(log)?;

    let ticks_per_second = (1.0 / delta).ceil() as u32;
    let mut tick = 0;
    while tick < ticks {
        let ticks_to_run = ticks_per_second.min(ticks - tick);
        for _ in 0..ticks_to_run {
            tick += 1;
            world.tick(delta);
        }
        println!("{}", world.summary());
    }

    println!();
    println!("=== Final state ===");
    println!("{}", world.summary());
    world.finish()?;
    Ok(())
}

/// Validate counts, run one adaptive cycle, and report the saved logs
#[allow(clippy::too_many_arguments)]
fn run_adaptive(
    north: &str,
    east: &str,
    south: &str,
    west: &str,
    log_dir: &Path,
    time_scale: f32,
    open_logs: bool,
) -> Result<()> {
    // Reject bad input before any run state exists
    let counts = VehicleCounts::parse(north, east, south, west)?;

    let allocation = allocate_green_times(&counts);
    println!("Green time allocation:");
    for direction in Direction::ALL {
        println!(
            "  {:<5} - Vehicles: {:>3} | Green Time: {}s",
            direction.to_string(),
            counts.get(direction),
            allocation[direction.index()]
        );
    }
    println!();

    let runner = AdaptiveRunner::new(log_dir).with_time_scale(time_scale);
    let started = runner.start(counts)?;
    ensure!(started, "a run is already in progress");

    let mut last_reported = None;
    while runner.is_running() {
        let snapshot = runner.snapshot();
        match snapshot.active {
            Some(direction) => {
                let line = (direction, snapshot.countdown_secs);
                if last_reported != Some(line) {
                    println!("{} light GREEN - {}s remaining", direction, snapshot.countdown_secs);
                    last_reported = Some(line);
                }
            }
            None => {
                if last_reported.take().is_some() {
                    println!("All red - pedestrians WALK");
                }
            }
        }
        thread::sleep(Duration::from_millis(50));
    }

    if let Some((txt_path, csv_path)) = runner.wait()? {
        println!();
        println!("Logs saved:");
        println!("  {}", txt_path.display());
        println!("  {}", csv_path.display());
        if open_logs {
            open_log_location(log_dir)?;
        }
    }
    Ok(())
}
