//! Frequency-domain view of an impulse response.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fft::{Fft, to_db};

/// Single-sided magnitude spectrum of a real coefficient sequence.
///
/// `magnitude[k]` is the modulus of the unnormalized DFT at bin `k` and
/// `frequency[k] = k * sample_rate / N`, for `k = 0..=N/2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    magnitude: Vec<f64>,
    frequency: Vec<f64>,
    sample_rate: f64,
    fft_size: usize,
}

impl Spectrum {
    /// Transform a coefficient sequence sampled at `sample_rate` Hz.
    pub fn from_coefficients(coefficients: &[f64], sample_rate: f64) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(Error::EmptyInput("coefficient sequence"));
        }
        if !(sample_rate > 0.0 && sample_rate.is_finite()) {
            return Err(Error::invalid(
                "sample_rate",
                format!("{sample_rate} must be a positive finite number"),
            ));
        }

        let fft_size = coefficients.len();
        let bins = Fft::new(fft_size).forward(coefficients);

        let bin_width = sample_rate / fft_size as f64;
        let magnitude = bins.iter().map(|c| c.norm()).collect();
        let frequency = (0..bins.len()).map(|k| k as f64 * bin_width).collect();

        Ok(Self {
            magnitude,
            frequency,
            sample_rate,
            fft_size,
        })
    }

    /// Linear magnitude per bin.
    pub fn magnitude(&self) -> &[f64] {
        &self.magnitude
    }

    /// Bin center frequencies in Hz.
    pub fn frequency(&self) -> &[f64] {
        &self.frequency
    }

    /// Magnitude per bin in dB.
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.magnitude.iter().map(|&m| to_db(m)).collect()
    }

    /// Sampling rate the spectrum was computed for.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Length of the transformed sequence.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Frequency spacing between bins in Hz.
    pub fn bin_width(&self) -> f64 {
        self.sample_rate / self.fft_size as f64
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.magnitude.len()
    }

    /// Always `false` for a spectrum built by [`Spectrum::from_coefficients`].
    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// Iterate `(frequency, magnitude)` pairs in bin order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequency
            .iter()
            .copied()
            .zip(self.magnitude.iter().copied())
    }

    /// Split into `(magnitude, frequency)`.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.magnitude, self.frequency)
    }
}
