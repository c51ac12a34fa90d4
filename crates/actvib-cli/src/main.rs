//! ActVib CLI - batch vibration analysis of actuator/accelerometer recordings.

mod commands;

use clap::{Parser, Subcommand};
use commands::common::CommonArgs;

#[derive(Parser)]
#[command(name = "actvib")]
#[command(author, version, about = "ActVib vibration analysis CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect one sample file or every sample in a folder
    Check(commands::check::CheckArgs),

    /// Group samples by wear level
    Organize(commands::organize::OrganizeArgs),

    /// Export the frequency response of every sample
    Spectra(commands::batch::SpectraArgs),

    /// Extract the resonances of every sample
    Resonances(commands::batch::ResonancesArgs),

    /// Show or create the configuration file
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => commands::check::run(args, &cli.common),
        Commands::Organize(args) => commands::organize::run(args, &cli.common),
        Commands::Spectra(args) => commands::batch::run_spectra(args, &cli.common),
        Commands::Resonances(args) => commands::batch::run_resonances(args, &cli.common),
        Commands::Config(args) => commands::config::run(args, &cli.common),
    }
}
