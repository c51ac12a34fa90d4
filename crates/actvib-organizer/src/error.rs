//! Error types for the organizer.

use crate::naming::PathFormatError;
use crate::table::ResultKey;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while labelling, analysing or exporting samples.
#[derive(Debug, Error)]
pub enum Error {
    /// The handler was asked to run without an excitation or response channel.
    #[error("{0} channel is not set")]
    Configuration(&'static str),

    /// A sample path does not follow the naming convention.
    #[error(transparent)]
    PathFormat(#[from] PathFormatError),

    /// The numerical pipeline rejected the input.
    #[error(transparent)]
    Analysis(#[from] actvib_analysis::Error),

    /// The sample could not be loaded or lacks a channel.
    #[error(transparent)]
    Io(#[from] actvib_io::Error),

    /// A directory could not be listed.
    #[error("failed to list '{path}': {source}")]
    Discovery {
        /// Directory being listed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Another sample of the batch already produced this result key.
    #[error(
        "duplicate sample '{}' at wear level {} for channel '{}'",
        key.sample,
        key.wear_level,
        key.channel
    )]
    DuplicateSample {
        /// The colliding key.
        key: ResultKey,
    },

    /// The worker pool could not be started.
    #[error("failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// A result table could not be written.
    #[error("failed to export '{path}': {source}")]
    Export {
        /// Destination file.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

/// Result type for organizer operations.
pub type Result<T> = std::result::Result<T, Error>;
