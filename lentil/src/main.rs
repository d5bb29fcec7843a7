mod run_density;
mod run_sim;

use crate::run_density::*;
use crate::run_sim::*;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Plot posterior densities of one or more trace files
    Density(DensityArgs),

    /// Simulate draws of a toy hierarchical model.
    Simulate(SimArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.commands {
        Commands::Density(args) => {
            run_density_plot(args.clone())?;
        }
        Commands::Simulate(args) => {
            run_sim_trace(args.clone())?;
        }
    }

    Ok(())
}
