use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rs_dual_arm_kinematics::demo::{run_demo, DemoConfig};
use rs_dual_arm_kinematics::world::{World, WorldConfig};

/// Places a turtlebot at random spots of the floor next to an obstacle and reports
/// collisions.
#[derive(Parser, Debug)]
#[command(name = "turtlebot_demo")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Side of the square floor, meters
    #[arg(long, default_value_t = 2.0)]
    floor_width: f64,

    /// Number of random placements
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Random seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Pause after every placement, seconds
    #[arg(long, default_value_t = 1.0)]
    wait: f64,

    /// Pace the loop in real time and wait for enter at the end
    #[arg(long)]
    gui: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let wait = Duration::try_from_secs_f64(cli.wait)
        .with_context(|| format!("Invalid wait time {}", cli.wait))?;
    let config = DemoConfig {
        floor_width: cli.floor_width,
        iterations: cli.iterations,
        seed: cli.seed,
        wait,
    };

    let mut world = World::connect(WorldConfig { gui: cli.gui });
    let records = run_demo(&config, &mut world).context("Demo failed")?;
    let collisions = records.iter().filter(|record| record.collision).count();
    tracing::info!("{} placements, {} in collision", records.len(), collisions);
    world.disconnect();
    Ok(())
}
