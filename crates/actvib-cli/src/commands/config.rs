//! Configuration file commands.

use super::common::{CommonArgs, load_config};
use actvib_config::{AnalysisConfig, default_config_path, ensure_user_config_dir, find_config};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Write the default configuration to a file
    Init {
        /// Destination (default: the user config directory)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show where the configuration is looked up
    Paths,
}

pub fn run(args: ConfigArgs, common: &CommonArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show(common),
        ConfigCommand::Init { path, force } => init(path, force),
        ConfigCommand::Paths => {
            println!("User config: {}", default_config_path().display());
            match find_config(common.config.as_deref()) {
                Some(path) => println!("In use:      {}", path.display()),
                None => println!("In use:      (built-in defaults)"),
            }
            Ok(())
        }
    }
}

fn show(common: &CommonArgs) -> anyhow::Result<()> {
    let config = load_config(common)?;
    print!("{}", config.to_toml()?);
    Ok(())
}

fn init(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path,
        None => ensure_user_config_dir()?.join(actvib_config::CONFIG_FILE_NAME),
    };

    if path.exists() && !force {
        anyhow::bail!(
            "'{}' already exists. Use --force to overwrite.",
            path.display()
        );
    }

    AnalysisConfig::default().save(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
