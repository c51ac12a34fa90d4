//! The analysis configuration file.

use crate::error::ConfigError;
use crate::validation::validate_config;
use actvib_analysis::{NlmsParams, PeakConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Placeholder replaced by the actuator index in the excitation channel name.
pub const ACTUATOR_PLACEHOLDER: &str = "{actuator}";

/// Default sampling rate of the acquisition hardware, in Hz.
pub const DEFAULT_SAMPLE_RATE: f64 = 416.0;

/// Analysis settings shared by every command.
///
/// # TOML Format
///
/// ```toml
/// sample_rate = 416.0
/// excitation = "dac{actuator}"
/// responses = ["imu2accz"]
/// workers = 0
///
/// [filter]
/// memory_size = 2000
/// step_size = 0.5
/// regularization = 1e-6
///
/// [peaks]
/// height_ratio = 0.33
/// min_distance = 8
/// prominence = 30.0
///
/// [naming]
/// extension = "csv"
/// beam_marker = "Viga"
/// intact_marker = "Intacta"
/// actuator_token = 1
/// actuator_char = 1
/// ```
///
/// Every key is optional; missing keys take the values above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Sampling rate of the recordings in Hz.
    pub sample_rate: f64,
    /// Excitation channel name. `{actuator}` is replaced by the actuator
    /// index parsed from the sample file name.
    pub excitation: String,
    /// Response channels analysed for each sample.
    pub responses: Vec<String>,
    /// Worker threads for batch runs. `0` uses every available core.
    pub workers: usize,
    /// Adaptive filter settings.
    pub filter: NlmsParams,
    /// Peak search settings.
    pub peaks: PeakConfig,
    /// Sample file naming rules.
    pub naming: NamingConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            excitation: format!("dac{ACTUATOR_PLACEHOLDER}"),
            responses: vec!["imu2accz".to_string()],
            workers: 0,
            filter: NlmsParams::default(),
            peaks: PeakConfig::default(),
            naming: NamingConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = self.to_toml()?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every setting, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self)?;
        Ok(())
    }

    /// Excitation channel name for an actuator.
    ///
    /// ```rust
    /// use actvib_config::AnalysisConfig;
    ///
    /// assert_eq!(AnalysisConfig::default().excitation_channel(3), "dac3");
    /// ```
    pub fn excitation_channel(&self, actuator: u8) -> String {
        self.excitation
            .replace(ACTUATOR_PLACEHOLDER, &actuator.to_string())
    }

    /// Number of worker threads to use, resolving `0` to the core count.
    pub fn worker_count(&self) -> usize {
        match self.workers {
            0 => std::thread::available_parallelism().map_or(1, usize::from),
            n => n,
        }
    }
}

/// How sample files are named and arranged on disk.
///
/// A sample at `.../Viga 3/run_d2_x.csv` belongs to wear level 3 and was
/// excited by actuator 2: the actuator digit is character `actuator_char` of
/// the `_`-separated token `actuator_token` of the file stem. A beam
/// directory containing `intact_marker` is wear level 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Sample file extension, without the dot.
    pub extension: String,
    /// Substring identifying a beam directory.
    pub beam_marker: String,
    /// Substring identifying the undamaged beam directory.
    pub intact_marker: String,
    /// Index of the `_`-separated stem token holding the actuator digit.
    pub actuator_token: usize,
    /// Character index of the actuator digit within that token.
    pub actuator_char: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            extension: "csv".to_string(),
            beam_marker: "Viga".to_string(),
            intact_marker: "Intacta".to_string(),
            actuator_token: 1,
            actuator_char: 1,
        }
    }
}
