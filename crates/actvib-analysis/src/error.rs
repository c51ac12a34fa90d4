//! Error types for the numerical stages.

use thiserror::Error;

/// Errors raised by the adaptive filter, spectral transform and peak search.
///
/// The numerical stages never return partially computed results: any of these
/// errors means no output was produced for that input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The excitation holds fewer samples than the filter memory, so no
    /// update step could run.
    #[error("input has {len} samples but the filter memory needs at least {memory_size}")]
    InsufficientSamples {
        /// Number of excitation samples supplied.
        len: usize,
        /// Configured filter memory size.
        memory_size: usize,
    },

    /// Two sequences that must be time-aligned have different lengths.
    #[error("{what} length mismatch: {left} vs {right}")]
    LengthMismatch {
        /// Which pair of sequences disagreed.
        what: &'static str,
        /// Length of the first sequence.
        left: usize,
        /// Length of the second sequence.
        right: usize,
    },

    /// A tuning parameter is outside its valid range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The stage was given an empty sequence.
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),
}

impl Error {
    /// Returns `true` for violations of the sample preconditions (too short or
    /// misaligned input), as opposed to bad tuning parameters.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::InsufficientSamples { .. } | Error::LengthMismatch { .. } | Error::EmptyInput(_)
        )
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Convenience result type for the analysis crate.
pub type Result<T> = std::result::Result<T, Error>;
