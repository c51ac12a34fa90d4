//! Configuration for the ActVib vibration analysis tools.
//!
//! A single TOML file holds everything the batch tools need: the sampling
//! rate, which channels to pair, the adaptive filter and peak search settings,
//! and the naming rules used to read wear level and actuator from sample
//! paths.
//!
//! # Example
//!
//! ```rust,no_run
//! use actvib_config::{AnalysisConfig, find_config};
//!
//! let config = match find_config(None) {
//!     Some(path) => AnalysisConfig::load(path).unwrap(),
//!     None => AnalysisConfig::default(),
//! };
//! println!("excitation for actuator 2: {}", config.excitation_channel(2));
//! ```

mod analysis_config;
mod error;

/// Platform-specific configuration paths.
pub mod paths;

/// Configuration validation.
pub mod validation;

pub use analysis_config::{
    ACTUATOR_PLACEHOLDER, AnalysisConfig, DEFAULT_SAMPLE_RATE, NamingConfig,
};
pub use error::ConfigError;
pub use paths::{
    CONFIG_FILE_NAME, default_config_path, ensure_user_config_dir, find_config, user_config_dir,
};
pub use validation::{ValidationError, ValidationResult, is_excitation_template, validate_config};

/// Re-export the parameter types embedded in the configuration
pub use actvib_analysis::{NlmsParams, PeakConfig};
