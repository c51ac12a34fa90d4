//! In-memory sample representation.

use crate::{Error, Result};

/// Name of the timestamp column written by the acquisition firmware.
pub const TIME_COLUMN: &str = "time";

/// One line of the acquisition log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Timestamp as recorded by the firmware.
    pub timestamp: String,
    /// Log message.
    pub message: String,
}

impl LogEntry {
    /// Create a log entry.
    pub fn new(timestamp: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            message: message.into(),
        }
    }
}

/// A named multi-channel time series.
///
/// All channels share the same sampling instants, so every column has the
/// same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    name: String,
    sample_rate: f64,
    columns: Vec<String>,
    data: Vec<Vec<f64>>,
    log: Vec<LogEntry>,
}

impl Sample {
    /// Build a sample from `(column name, values)` pairs.
    ///
    /// Fails when there are no columns, no rows, or the columns differ in
    /// length.
    pub fn from_columns(
        name: impl Into<String>,
        sample_rate: f64,
        columns: Vec<(String, Vec<f64>)>,
    ) -> Result<Self> {
        let name = name.into();
        let Some(expected) = columns.first().map(|(_, values)| values.len()) else {
            return Err(Error::EmptySample(name));
        };
        if expected == 0 {
            return Err(Error::EmptySample(name));
        }
        if let Some((column, values)) = columns.iter().find(|(_, v)| v.len() != expected) {
            return Err(Error::RaggedColumns {
                column: column.clone(),
                len: values.len(),
                expected,
            });
        }

        let (columns, data) = columns.into_iter().unzip();
        Ok(Self {
            name,
            sample_rate,
            columns,
            data,
            log: Vec::new(),
        })
    }

    /// Attach an acquisition log.
    pub fn with_log(mut self, log: Vec<LogEntry>) -> Self {
        self.log = log;
        self
    }

    /// Sample name (file stem).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sampling rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    /// Returns `true` if the sample has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Duration covered by the sample in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / self.sample_rate
    }

    /// Column names in file order.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Returns `true` if the sample has a column named `channel`.
    pub fn has_channel(&self, channel: &str) -> bool {
        self.columns.iter().any(|c| c == channel)
    }

    /// Values of one channel.
    pub fn channel(&self, channel: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == channel)
            .map(|i| self.data[i].as_slice())
            .ok_or_else(|| Error::MissingChannel {
                sample: self.name.clone(),
                channel: channel.to_string(),
            })
    }

    /// The `time` column, when present.
    pub fn time(&self) -> Option<&[f64]> {
        self.channel(TIME_COLUMN).ok()
    }

    /// Acquisition log entries.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Iterate `(column name, values)` pairs.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().map(Vec::as_slice))
    }
}
