//! Batch results keyed by wear level, sample and response channel.

use crate::error::{Error, Result};
use actvib_analysis::{Resonance, Spectrum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Row key of a [`ResultTable`]. Orders by wear level, then sample name,
/// then channel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResultKey {
    /// Wear level of the beam.
    pub wear_level: u32,
    /// Sample name.
    pub sample: String,
    /// Response channel.
    pub channel: String,
}

impl ResultKey {
    /// Create a key.
    pub fn new(wear_level: u32, sample: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            wear_level,
            sample: sample.into(),
            channel: channel.into(),
        }
    }
}

/// Pipeline output for one response channel of one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelResult {
    /// Actuator that excited the beam.
    pub actuator: u8,
    /// Magnitude spectrum of the estimated impulse response.
    pub spectrum: Spectrum,
    /// Resonances, when the batch extracted them.
    pub resonances: Option<Vec<Resonance>>,
}

/// Ordered collection of batch results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    rows: BTreeMap<ResultKey, ChannelResult>,
}

impl ResultTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result, returning the one it replaced.
    pub fn insert(&mut self, key: ResultKey, result: ChannelResult) -> Option<ChannelResult> {
        self.rows.insert(key, result)
    }

    /// Returns `true` if a result is stored under `key`.
    pub fn contains_key(&self, key: &ResultKey) -> bool {
        self.rows.contains_key(key)
    }

    /// Look up a result.
    pub fn get(&self, key: &ResultKey) -> Option<&ChannelResult> {
        self.rows.get(key)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ResultKey, &ChannelResult)> {
        self.rows.iter()
    }

    /// Total number of resonances across all rows.
    pub fn resonance_count(&self) -> usize {
        self.rows
            .values()
            .filter_map(|r| r.resonances.as_ref())
            .map(Vec::len)
            .sum()
    }

    /// Write one magnitude row per key, one column per frequency bin.
    ///
    /// The frequency header comes from the first row; all rows of a batch
    /// share the filter length and sampling rate.
    pub fn write_spectra<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut out = csv::WriterBuilder::new().flexible(true).from_writer(writer);

        let mut header = vec![
            "wear_level".to_string(),
            "sample".to_string(),
            "channel".to_string(),
            "actuator".to_string(),
        ];
        if let Some(first) = self.rows.values().next() {
            header.extend(first.spectrum.frequency().iter().map(f64::to_string));
        }
        out.write_record(&header)?;

        for (key, result) in &self.rows {
            let mut record = vec![
                key.wear_level.to_string(),
                key.sample.clone(),
                key.channel.clone(),
                result.actuator.to_string(),
            ];
            record.extend(result.spectrum.magnitude().iter().map(f64::to_string));
            out.write_record(&record)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Write one row per resonance.
    pub fn write_resonances<W: Write>(&self, writer: W) -> csv::Result<()> {
        #[derive(Serialize)]
        struct Row<'a> {
            wear_level: u32,
            sample: &'a str,
            channel: &'a str,
            actuator: u8,
            frequency: f64,
            amplitude: f64,
            prominence: f64,
            width: f64,
        }

        let mut out = csv::Writer::from_writer(writer);
        for (key, result) in &self.rows {
            for peak in result.resonances.iter().flatten() {
                out.serialize(Row {
                    wear_level: key.wear_level,
                    sample: &key.sample,
                    channel: &key.channel,
                    actuator: result.actuator,
                    frequency: peak.frequency,
                    amplitude: peak.amplitude,
                    prominence: peak.prominence,
                    width: peak.width,
                })?;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Export the spectra to a CSV file.
    pub fn export_spectra(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path).map_err(|e| export_error(path, e.into()))?;
        self.write_spectra(file).map_err(|e| export_error(path, e))
    }

    /// Export the resonances to a CSV file.
    pub fn export_resonances(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path).map_err(|e| export_error(path, e.into()))?;
        self.write_resonances(file).map_err(|e| export_error(path, e))
    }
}

fn export_error(path: &Path, source: csv::Error) -> Error {
    Error::Export {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(resonances: Option<Vec<Resonance>>) -> ChannelResult {
        ChannelResult {
            actuator: 1,
            spectrum: Spectrum::from_coefficients(&[1.0, 0.0, 0.0, 0.0], 416.0).unwrap(),
            resonances,
        }
    }

    fn peak(frequency: f64) -> Resonance {
        Resonance {
            amplitude: 50.0,
            frequency,
            index: 1,
            prominence: 40.0,
            width: 2.0,
        }
    }

    #[test]
    fn rows_ordered_by_key() {
        let mut table = ResultTable::new();
        table.insert(ResultKey::new(2, "b", "imu2accz"), result(None));
        table.insert(ResultKey::new(0, "z", "imu2accz"), result(None));
        table.insert(ResultKey::new(2, "a", "imu2accz"), result(None));

        let keys: Vec<_> = table.iter().map(|(k, _)| (k.wear_level, k.sample.as_str())).collect();
        assert_eq!(keys, vec![(0, "z"), (2, "a"), (2, "b")]);
    }

    #[test]
    fn spectra_csv_layout() {
        let mut table = ResultTable::new();
        table.insert(ResultKey::new(0, "run_d1_a", "imu2accz"), result(None));

        let mut buf = Vec::new();
        table.write_spectra(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "wear_level,sample,channel,actuator,0,104,208");
        assert_eq!(lines[1], "0,run_d1_a,imu2accz,1,1,1,1");
    }

    #[test]
    fn resonances_csv_one_row_per_peak() {
        let mut table = ResultTable::new();
        table.insert(
            ResultKey::new(3, "run_d2_a", "imu2accz"),
            result(Some(vec![peak(40.0), peak(120.5)])),
        );
        table.insert(ResultKey::new(0, "run_d1_a", "imu2accz"), result(Some(vec![])));
        assert_eq!(table.resonance_count(), 2);

        let mut buf = Vec::new();
        table.write_resonances(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "wear_level,sample,channel,actuator,frequency,amplitude,prominence,width"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("3,run_d2_a,imu2accz,1,120.5,"));
    }
}
