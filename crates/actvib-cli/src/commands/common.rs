//! Shared CLI helpers used across multiple commands.

use actvib_config::{AnalysisConfig, find_config};
use actvib_organizer::{ActVibNaming, NamingConvention, discover_samples};
use clap::Args;
use std::path::{Path, PathBuf};

/// Options accepted by every command.
#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// Configuration file (default: ./actvib.toml, then the user config directory)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Worker threads for batch commands (0 = all cores)
    #[arg(long, value_name = "N", global = true)]
    pub workers: Option<usize>,

    /// Response channel to analyse; repeat for several (overrides the config)
    #[arg(long = "imu", value_name = "CHANNEL", global = true)]
    pub responses: Vec<String>,
}

/// Load the configuration and apply command-line overrides.
pub fn load_config(common: &CommonArgs) -> anyhow::Result<AnalysisConfig> {
    let mut config = match find_config(common.config.as_deref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            AnalysisConfig::load(&path)
                .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?
        }
        None => {
            if let Some(path) = &common.config {
                anyhow::bail!("configuration file '{}' not found", path.display());
            }
            AnalysisConfig::default()
        }
    };

    if let Some(workers) = common.workers {
        config.workers = workers;
    }
    if !common.responses.is_empty() {
        config.responses = common.responses.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Sample files at `path`: the file itself, or every sample below a folder.
pub fn sample_paths(path: &Path, naming: &ActVibNaming) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_dir() {
        let paths = discover_samples(path, naming)?;
        if paths.is_empty() {
            anyhow::bail!("no sample files found under '{}'", path.display());
        }
        Ok(paths)
    } else if path.is_file() {
        if !naming.is_sample_file(path) {
            tracing::warn!(path = %path.display(), "unexpected sample file extension");
        }
        Ok(vec![path.to_path_buf()])
    } else {
        anyhow::bail!("'{}' does not exist", path.display())
    }
}
