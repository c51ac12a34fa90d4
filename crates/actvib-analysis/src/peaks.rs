//! Resonance extraction by peak picking on a magnitude spectrum.
//!
//! The search runs the classic peak-detection sweep in four filters:
//!
//! 1. **Local maxima**: samples higher than both neighbours. A flat plateau
//!    counts once, at its middle sample.
//! 2. **Height**: the peak must reach `mean + |mean| * height_ratio`.
//! 3. **Distance**: peaks are visited tallest first; a kept peak discards
//!    every other peak closer than `min_distance` bins.
//! 4. **Prominence**: the drop from the peak to the higher of the two
//!    lowest points reached before a taller sample (or the border) must be at
//!    least `prominence`.
//!
//! An optional width filter measures the peak width at half prominence.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::spectrum::Spectrum;

/// Sensitivity knobs of the resonance search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakConfig {
    /// Height threshold relative to the mean magnitude.
    pub height_ratio: f64,
    /// Minimum index distance between two reported peaks.
    pub min_distance: usize,
    /// Minimum topographic prominence.
    pub prominence: f64,
    /// Minimum width in bins at half prominence. Disabled when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            height_ratio: 0.33,
            min_distance: 8,
            prominence: 30.0,
            min_width: None,
        }
    }
}

impl PeakConfig {
    /// Set the relative height threshold.
    pub fn with_height_ratio(mut self, height_ratio: f64) -> Self {
        self.height_ratio = height_ratio;
        self
    }

    /// Set the minimum peak distance in bins.
    pub fn with_min_distance(mut self, min_distance: usize) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Set the minimum prominence.
    pub fn with_prominence(mut self, prominence: f64) -> Self {
        self.prominence = prominence;
        self
    }

    /// Enable the width filter.
    pub fn with_min_width(mut self, min_width: f64) -> Self {
        self.min_width = Some(min_width);
        self
    }

    /// Reject non-finite or negative thresholds.
    pub fn validate(&self) -> Result<()> {
        if !self.height_ratio.is_finite() {
            return Err(Error::invalid("height_ratio", "must be finite"));
        }
        if !(self.prominence >= 0.0 && self.prominence.is_finite()) {
            return Err(Error::invalid(
                "prominence",
                format!("{} must be a non-negative finite number", self.prominence),
            ));
        }
        if let Some(width) = self.min_width
            && !(width >= 0.0 && width.is_finite())
        {
            return Err(Error::invalid(
                "min_width",
                format!("{width} must be a non-negative finite number"),
            ));
        }
        Ok(())
    }
}

/// A detected spectral peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resonance {
    /// Magnitude at the peak.
    pub amplitude: f64,
    /// Frequency of the peak bin in Hz.
    pub frequency: f64,
    /// Bin index of the peak.
    pub index: usize,
    /// Topographic prominence of the peak.
    pub prominence: f64,
    /// Width in bins at half prominence.
    pub width: f64,
}

/// Find resonances in a magnitude spectrum.
///
/// `magnitude` and `frequency` must have equal length. Peaks come back in
/// ascending index order, each carrying its source magnitude and frequency.
pub fn find_resonances(
    magnitude: &[f64],
    frequency: &[f64],
    config: &PeakConfig,
) -> Result<Vec<Resonance>> {
    config.validate()?;
    if magnitude.len() != frequency.len() {
        return Err(Error::LengthMismatch {
            what: "magnitude/frequency",
            left: magnitude.len(),
            right: frequency.len(),
        });
    }
    if magnitude.is_empty() {
        return Ok(Vec::new());
    }

    let mean = magnitude.iter().sum::<f64>() / magnitude.len() as f64;
    let height = mean + (mean * config.height_ratio).abs();

    let mut peaks: Vec<usize> = local_maxima(magnitude)
        .into_iter()
        .filter(|&i| magnitude[i] >= height)
        .collect();

    if config.min_distance > 1 {
        peaks = select_by_distance(magnitude, &peaks, config.min_distance);
    }

    let mut resonances = Vec::with_capacity(peaks.len());
    for peak in peaks {
        let shape = PeakShape::measure(magnitude, peak);
        if shape.prominence < config.prominence {
            continue;
        }
        let width = shape.width(magnitude, peak);
        if let Some(min_width) = config.min_width
            && width < min_width
        {
            continue;
        }
        resonances.push(Resonance {
            amplitude: magnitude[peak],
            frequency: frequency[peak],
            index: peak,
            prominence: shape.prominence,
            width,
        });
    }

    Ok(resonances)
}

/// Find resonances in a [`Spectrum`].
pub fn spectrum_resonances(spectrum: &Spectrum, config: &PeakConfig) -> Result<Vec<Resonance>> {
    find_resonances(spectrum.magnitude(), spectrum.frequency(), config)
}

/// Indices of local maxima; plateaus report their middle sample.
fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut maxima = Vec::new();
    if x.len() < 3 {
        return maxima;
    }

    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                let right_edge = ahead - 1;
                maxima.push((i + right_edge) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    maxima
}

/// Keep the tallest peak of every cluster closer than `distance` bins.
///
/// Ties in height resolve in favour of the leftmost peak. SciPy's
/// `find_peaks` keeps the rightmost one instead, so equal-height clusters can
/// select a different bin than a SciPy run on the same spectrum.
fn select_by_distance(x: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| x[peaks[b]].total_cmp(&x[peaks[a]]).then(a.cmp(&b)));

    let mut keep = vec![true; peaks.len()];
    for &j in &order {
        if !keep[j] {
            continue;
        }
        for k in (0..j).rev() {
            if peaks[j] - peaks[k] >= distance {
                break;
            }
            keep[k] = false;
        }
        for k in j + 1..peaks.len() {
            if peaks[k] - peaks[j] >= distance {
                break;
            }
            keep[k] = false;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

/// Prominence of a peak and the bases it was measured against.
struct PeakShape {
    prominence: f64,
    left_base: usize,
    right_base: usize,
}

impl PeakShape {
    fn measure(x: &[f64], peak: usize) -> Self {
        let top = x[peak];

        let mut left_base = peak;
        let mut left_min = top;
        for i in (0..=peak).rev() {
            if x[i] > top {
                break;
            }
            if x[i] < left_min {
                left_min = x[i];
                left_base = i;
            }
        }

        let mut right_base = peak;
        let mut right_min = top;
        for (i, &value) in x.iter().enumerate().skip(peak) {
            if value > top {
                break;
            }
            if value < right_min {
                right_min = value;
                right_base = i;
            }
        }

        Self {
            prominence: top - left_min.max(right_min),
            left_base,
            right_base,
        }
    }

    /// Width at half prominence, linearly interpolated between samples.
    fn width(&self, x: &[f64], peak: usize) -> f64 {
        let level = x[peak] - self.prominence * 0.5;

        let mut i = peak;
        while self.left_base < i && level < x[i] {
            i -= 1;
        }
        let mut left = i as f64;
        if x[i] < level {
            left += (level - x[i]) / (x[i + 1] - x[i]);
        }

        let mut i = peak;
        while i < self.right_base && level < x[i] {
            i += 1;
        }
        let mut right = i as f64;
        if x[i] < level {
            right -= (level - x[i]) / (x[i - 1] - x[i]);
        }

        right - left
    }
}
