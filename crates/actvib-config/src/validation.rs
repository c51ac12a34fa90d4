//! Configuration validation.
//!
//! Every problem found is reported, not only the first one, so a hand-edited
//! TOML file can be fixed in one pass.
//!
//! # Example
//!
//! ```rust
//! use actvib_config::{AnalysisConfig, validate_config};
//!
//! let mut config = AnalysisConfig::default();
//! assert!(validate_config(&config).is_ok());
//!
//! config.responses.clear();
//! assert!(validate_config(&config).is_err());
//! ```

use crate::analysis_config::{ACTUATOR_PLACEHOLDER, AnalysisConfig};
use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A required list or string is empty.
    #[error("'{field}' must not be empty")]
    Empty {
        /// Field name.
        field: String,
    },

    /// A numeric setting is outside its valid range.
    #[error("'{field}' = {value} is invalid: {reason}")]
    OutOfRange {
        /// Field name.
        field: String,
        /// Offending value.
        value: f64,
        /// Why the value was rejected.
        reason: String,
    },

    /// A filter or peak parameter was rejected by the analysis crate.
    #[error("{0}")]
    Analysis(#[from] actvib_analysis::Error),

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a full analysis configuration.
pub fn validate_config(config: &AnalysisConfig) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if !(config.sample_rate > 0.0 && config.sample_rate.is_finite()) {
        errors.push(ValidationError::OutOfRange {
            field: "sample_rate".to_string(),
            value: config.sample_rate,
            reason: "must be a positive finite number".to_string(),
        });
    }
    if config.excitation.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "excitation".to_string(),
        });
    }
    if config.responses.is_empty() || config.responses.iter().any(|r| r.trim().is_empty()) {
        errors.push(ValidationError::Empty {
            field: "responses".to_string(),
        });
    }
    if let Err(e) = config.filter.validate() {
        errors.push(e.into());
    }
    if let Err(e) = config.peaks.validate() {
        errors.push(e.into());
    }

    let naming = &config.naming;
    for (field, value) in [
        ("naming.extension", &naming.extension),
        ("naming.beam_marker", &naming.beam_marker),
        ("naming.intact_marker", &naming.intact_marker),
    ] {
        if value.is_empty() {
            errors.push(ValidationError::Empty {
                field: field.to_string(),
            });
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

/// Returns `true` if the excitation name is a template over the actuator index.
pub fn is_excitation_template(excitation: &str) -> bool {
    excitation.contains(ACTUATOR_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&AnalysisConfig::default()), Ok(()));
    }

    #[test]
    fn single_error_is_not_wrapped() {
        let config = AnalysisConfig {
            sample_rate: -1.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "sample_rate"
        ));
    }

    #[test]
    fn all_errors_reported() {
        let mut config = AnalysisConfig::default();
        config.responses.clear();
        config.filter.memory_size = 0;
        config.naming.beam_marker.clear();

        match validate_config(&config) {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected multiple errors, got {other:?}"),
        }
    }

    #[test]
    fn peak_errors_come_from_analysis() {
        let mut config = AnalysisConfig::default();
        config.peaks.prominence = f64::NAN;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::Analysis(_)));
        assert!(err.to_string().contains("prominence"), "got: {err}");
    }

    #[test]
    fn template_detection() {
        assert!(is_excitation_template("dac{actuator}"));
        assert!(!is_excitation_template("dac1"));
    }
}
