#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Tower March headless.

mod placement;
mod render;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use placement::ScheduledPlacement;
use tower_march_core::{PlacementOutcome, SimulationConfig};
use tower_march_simulation::{query, Simulation};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tower-march", author, version, about = "Headless Tower March simulation", long_about = None)]
struct Cli {
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 50)]
    ticks: u64,
    /// Seed overriding the configured random stream.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file holding simulation parameters.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Turret placement as `x,y` or `x,y@tick`; may be repeated.
    #[arg(long = "place", value_parser = placement::parse)]
    placements: Vec<ScheduledPlacement>,
    /// Print only the final summary.
    #[arg(long)]
    quiet: bool,
    /// Keep ticking after the board is lost.
    #[arg(long)]
    keep_going: bool,
}

/// Entry point for the Tower March command-line interface.
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    info!(
        columns = config.columns,
        rows = config.rows,
        seed = config.seed,
        "starting simulation"
    );
    let mut simulation =
        Simulation::new(config).context("simulation configuration is invalid")?;

    for tick in 0..cli.ticks {
        for scheduled in cli.placements.iter().filter(|p| p.tick == tick) {
            match simulation.place(scheduled.cell) {
                PlacementOutcome::Rejected { reason } => warn!(
                    column = scheduled.cell.column(),
                    row = scheduled.cell.row(),
                    %reason,
                    "placement rejected"
                ),
                PlacementOutcome::ActivatedLink { target } => {
                    info!(link = target.get(), "link activated");
                }
                PlacementOutcome::Placed { .. } => {}
            }
        }

        let world = simulation.tick();
        if !cli.quiet {
            println!("{}{}\n", render::board(world), render::status(world));
        }
        if query::is_lost(world) && !cli.keep_going {
            info!(tick = query::tick_index(world), "board overrun");
            break;
        }
    }

    let world = simulation.world();
    println!(
        "ticks {} score {} lost {} entities {}",
        query::tick_index(world),
        query::score(world),
        query::is_lost(world),
        query::board(world).len(),
    );
    Ok(())
}

fn load_config(cli: &Cli) -> Result<SimulationConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            SimulationConfig::from_toml_str(&text)
                .with_context(|| format!("failed to load config file {}", path.display()))?
        }
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    Ok(config)
}
