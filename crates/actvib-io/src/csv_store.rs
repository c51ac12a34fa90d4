//! CSV reading and writing of samples and their log sidecar.

use crate::sample::{LogEntry, Sample};
use crate::{Error, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::path::{Path, PathBuf};

/// Path of the log sidecar for a sample file (`<stem>.log`).
pub fn log_path(sample_path: &Path) -> PathBuf {
    sample_path.with_extension("log")
}

/// Read a sample CSV file.
///
/// The first row holds the column names; every following row holds one
/// numeric value per column. The sample is named after the file stem and the
/// log sidecar is loaded when present.
pub fn read_sample<P: AsRef<Path>>(path: P, sample_rate: f64) -> Result<Sample> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| Error::csv(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| Error::csv(path, e))?
        .iter()
        .map(str::to_string)
        .collect();
    let mut data: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| Error::csv(path, e))?;
        for ((column, values), cell) in headers.iter().zip(data.iter_mut()).zip(record.iter()) {
            let value = cell.parse::<f64>().map_err(|_| Error::InvalidValue {
                column: column.clone(),
                row: row + 1,
                value: cell.to_string(),
            })?;
            values.push(value);
        }
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let log = read_log(&log_path(path))?;

    let sample = Sample::from_columns(name, sample_rate, headers.into_iter().zip(data).collect())?
        .with_log(log);

    tracing::debug!(
        path = %path.display(),
        rows = sample.len(),
        columns = sample.column_names().len(),
        log_entries = sample.log().len(),
        "loaded sample"
    );
    Ok(sample)
}

/// Read a log sidecar of `timestamp,message` lines.
///
/// A missing file yields an empty log. Commas after the first belong to the
/// message.
pub fn read_log(path: &Path) -> Result<Vec<LogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| Error::csv(path, e))?;

    let mut log = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::csv(path, e))?;
        let mut fields = record.iter();
        let Some(timestamp) = fields.next() else {
            continue;
        };
        let message = fields.collect::<Vec<_>>().join(",");
        log.push(LogEntry::new(timestamp, message));
    }
    Ok(log)
}

/// Write a sample as CSV, plus its log sidecar when the log is non-empty.
pub fn write_sample<P: AsRef<Path>>(path: P, sample: &Sample) -> Result<()> {
    let path = path.as_ref();
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .map_err(|e| Error::csv(path, e))?;

    writer
        .write_record(sample.column_names())
        .map_err(|e| Error::csv(path, e))?;

    let columns: Vec<&[f64]> = sample.columns().map(|(_, values)| values).collect();
    for row in 0..sample.len() {
        writer
            .write_record(columns.iter().map(|values| values[row].to_string()))
            .map_err(|e| Error::csv(path, e))?;
    }
    writer.flush()?;

    if !sample.log().is_empty() {
        let log_file = log_path(path);
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .from_path(&log_file)
            .map_err(|e| Error::csv(&log_file, e))?;
        for entry in sample.log() {
            writer
                .write_record([entry.timestamp.as_str(), entry.message.as_str()])
                .map_err(|e| Error::csv(&log_file, e))?;
        }
        writer.flush()?;
    }
    Ok(())
}
