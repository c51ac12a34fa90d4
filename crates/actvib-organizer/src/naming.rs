//! Sample path naming conventions.
//!
//! Recordings are stored as `<root>/.../<beam directory>/<sample file>`. The
//! beam directory carries the wear level and the sample file name carries the
//! actuator that drove the beam. [`NamingConvention`] abstracts those rules so
//! other lab layouts can be plugged in; [`ActVibNaming`] implements the
//! default one.

use actvib_config::NamingConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A path that does not follow the naming convention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathFormatError {
    /// The path has no file name component.
    #[error("'{0}' has no file name")]
    NoFileName(PathBuf),

    /// The file stem has too few `_`-separated tokens.
    #[error("sample name '{name}' has no token {token}")]
    MissingToken {
        /// File stem.
        name: String,
        /// Requested token index.
        token: usize,
    },

    /// The actuator token has no digit at the expected position.
    #[error("token '{token}' of sample '{name}' has no actuator digit at position {position}")]
    NoActuatorDigit {
        /// File stem.
        name: String,
        /// The token inspected.
        token: String,
        /// Character index inspected.
        position: usize,
    },

    /// No ancestor directory carries the beam marker.
    #[error("no '{marker}' directory above '{path}'")]
    NoBeamDirectory {
        /// Offending path.
        path: PathBuf,
        /// Beam marker searched for.
        marker: String,
    },

    /// The beam directory name does not end in a wear level.
    #[error("beam directory '{directory}' does not end in a wear level")]
    NoWearLevel {
        /// Beam directory name.
        directory: String,
    },
}

/// Rules mapping a sample path to its labels.
pub trait NamingConvention: Send + Sync {
    /// Returns `true` if the path looks like a sample file.
    fn is_sample_file(&self, path: &Path) -> bool;

    /// Sample name, the file stem.
    fn sample_name(&self, path: &Path) -> Result<String, PathFormatError> {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| PathFormatError::NoFileName(path.to_path_buf()))
    }

    /// Index of the actuator that excited the beam.
    fn actuator(&self, path: &Path) -> Result<u8, PathFormatError>;

    /// Wear level of the beam, 0 for the intact beam.
    fn wear_level(&self, path: &Path) -> Result<u32, PathFormatError>;
}

/// Default lab layout.
///
/// ```rust
/// use actvib_organizer::{ActVibNaming, NamingConvention};
/// use std::path::Path;
///
/// let naming = ActVibNaming::default();
/// let path = Path::new("Dados/Viga 3/run_d2_x.csv");
/// assert_eq!(naming.actuator(path), Ok(2));
/// assert_eq!(naming.wear_level(path), Ok(3));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActVibNaming {
    config: NamingConfig,
}

impl ActVibNaming {
    /// Create a naming convention from configuration.
    pub fn new(config: NamingConfig) -> Self {
        Self { config }
    }

    /// The underlying rules.
    pub fn config(&self) -> &NamingConfig {
        &self.config
    }
}

impl From<&NamingConfig> for ActVibNaming {
    fn from(config: &NamingConfig) -> Self {
        Self::new(config.clone())
    }
}

impl NamingConvention for ActVibNaming {
    fn is_sample_file(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.config.extension.as_str()))
    }

    fn actuator(&self, path: &Path) -> Result<u8, PathFormatError> {
        let name = self.sample_name(path)?;
        let token_index = self.config.actuator_token;
        let position = self.config.actuator_char;

        let token = name
            .split('_')
            .nth(token_index)
            .ok_or_else(|| PathFormatError::MissingToken {
                name: name.clone(),
                token: token_index,
            })?;

        token
            .chars()
            .nth(position)
            .and_then(|c| c.to_digit(10))
            .and_then(|d| u8::try_from(d).ok())
            .ok_or_else(|| PathFormatError::NoActuatorDigit {
                name: name.clone(),
                token: token.to_string(),
                position,
            })
    }

    fn wear_level(&self, path: &Path) -> Result<u32, PathFormatError> {
        let directory = path
            .ancestors()
            .skip(1)
            .filter_map(Path::file_name)
            .map(|name| name.to_string_lossy())
            .find(|name| name.contains(self.config.beam_marker.as_str()))
            .ok_or_else(|| PathFormatError::NoBeamDirectory {
                path: path.to_path_buf(),
                marker: self.config.beam_marker.clone(),
            })?;

        if directory.contains(self.config.intact_marker.as_str()) {
            return Ok(0);
        }

        let digits_start = directory
            .char_indices()
            .rev()
            .take_while(|(_, c)| c.is_ascii_digit())
            .last()
            .map(|(i, _)| i);

        digits_start
            .and_then(|start| directory[start..].parse().ok())
            .ok_or_else(|| PathFormatError::NoWearLevel {
                directory: directory.into_owned(),
            })
    }
}
