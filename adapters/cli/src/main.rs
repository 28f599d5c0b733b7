#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line entry point for the solar sweep simulator.

use clap::Parser;
use solar_sweep_cli::{args::CliArgs, run_scenario, write_history};
use solar_sweep_system_recorder::csv;
use tracing_subscriber::{fmt, EnvFilter};

/// Entry point for the solar sweep command-line interface.
fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = CliArgs::parse();
    let scenario = args.to_scenario()?;
    tracing::info!(scenario = ?scenario, "starting simulation");

    let outcome = run_scenario(&scenario)?;

    println!("{}", csv::HEADER);
    for run in &outcome.runs {
        println!("{}", csv::render_row(&run.summary));
    }

    if let Some(directory) = &args.output_dir {
        let path = write_history(&outcome, directory)?;
        println!("saved run history to {}", path.display());
    }

    Ok(())
}
