//! Sample store for ActVib vibration recordings.
//!
//! This crate provides:
//!
//! - **Samples**: [`Sample`], a named set of equal-length channels (a `time`
//!   column, actuator drives such as `dac1`, accelerometer axes such as
//!   `imu2accz`) plus the acquisition log
//! - **CSV I/O**: [`read_sample`] and [`write_sample`] for the tabular file
//!   format, with the log kept in a `<stem>.log` sidecar
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use actvib_io::read_sample;
//!
//! let sample = read_sample("Dados/VigaIntacta/ensaio_d1_01.csv", 416.0)?;
//! let drive = sample.channel("dac1")?;
//! let accel = sample.channel("imu2accz")?;
//! println!("{}: {} samples", sample.name(), drive.len().min(accel.len()));
//! # Ok::<(), actvib_io::Error>(())
//! ```

mod csv_store;
mod sample;

pub use csv_store::{log_path, read_log, read_sample, write_sample};
pub use sample::{LogEntry, Sample, TIME_COLUMN};

use std::path::PathBuf;

/// Error types for sample I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// CSV parse or write error.
    #[error("CSV error in '{path}': {source}")]
    Csv {
        /// File being read or written.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A cell could not be parsed as a number.
    #[error("invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        /// Column name.
        column: String,
        /// 1-based data row.
        row: usize,
        /// Raw cell content.
        value: String,
    },

    /// The requested channel does not exist in the sample.
    #[error("channel '{channel}' not found in sample '{sample}'")]
    MissingChannel {
        /// Sample name.
        sample: String,
        /// Requested channel.
        channel: String,
    },

    /// Columns of one sample have different lengths.
    #[error("column '{column}' has {len} samples, expected {expected}")]
    RaggedColumns {
        /// Offending column.
        column: String,
        /// Its length.
        len: usize,
        /// Length of the first column.
        expected: usize,
    },

    /// The sample has no columns or no rows.
    #[error("sample '{0}' contains no data")]
    EmptySample(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Error::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Convenience result type for sample I/O.
pub type Result<T> = std::result::Result<T, Error>;
