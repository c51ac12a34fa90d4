//! NLMS adaptive FIR filter for impulse-response estimation.
//!
//! The filter identifies the linear path between an excitation signal
//! (actuator drive) and a response signal (accelerometer axis) by adapting a
//! fixed-length coefficient vector one time step at a time. The converged
//! coefficients are the estimated impulse response of the structure.
//!
//! # Algorithm
//!
//! For every time step `t` with a full window of `M` excitation samples:
//!
//! ```text
//! y[t]   = Σ w[k] * x[t-k]                  (prediction, k = 0..M)
//! e[t]   = d[t] - y[t]                      (error: response minus prediction)
//! w[k]  += μ * e[t] * x[t-k] / (δ + xᵀx)    (normalized gradient step)
//! ```
//!
//! `δ` keeps the step finite when the window is silent; with an all-zero
//! window the update is exactly zero. Stability holds for `0 < μ < 2`
//! independent of the signal level.
//!
//! There is no convergence check: one update is applied per available time
//! step, and the coefficients left after the last sample are the estimate.
//!
//! # References
//!
//! - Haykin, "Adaptive Filter Theory" (5th ed.), chapter 6.
//! - Widrow & Stearns, "Adaptive Signal Processing" (1985), chapter 6.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tuning of the NLMS estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NlmsParams {
    /// Number of taps, i.e. the length of the estimated impulse response.
    pub memory_size: usize,
    /// Normalized step size μ, in (0, 2).
    pub step_size: f64,
    /// Regularization δ added to the window energy, > 0.
    pub regularization: f64,
}

impl Default for NlmsParams {
    fn default() -> Self {
        Self {
            memory_size: 2000,
            step_size: 0.5,
            regularization: 1e-6,
        }
    }
}

impl NlmsParams {
    /// Default parameters with the given memory size.
    pub fn new(memory_size: usize) -> Self {
        Self {
            memory_size,
            ..Self::default()
        }
    }

    /// Set the normalized step size μ.
    pub fn with_step_size(mut self, step_size: f64) -> Self {
        self.step_size = step_size;
        self
    }

    /// Set the regularization δ.
    pub fn with_regularization(mut self, regularization: f64) -> Self {
        self.regularization = regularization;
        self
    }

    /// Check every parameter against its valid range.
    pub fn validate(&self) -> Result<()> {
        if self.memory_size == 0 {
            return Err(Error::invalid("memory_size", "must be at least 1"));
        }
        if !(self.step_size > 0.0 && self.step_size < 2.0) {
            return Err(Error::invalid(
                "step_size",
                format!("{} is outside (0, 2)", self.step_size),
            ));
        }
        if !(self.regularization > 0.0 && self.regularization.is_finite()) {
            return Err(Error::invalid(
                "regularization",
                format!("{} must be a positive finite number", self.regularization),
            ));
        }
        Ok(())
    }
}

/// Normalized Least Mean Squares adaptive FIR filter.
///
/// Owns the adaptive state: the coefficient vector, a circular history of the
/// last `memory_size` excitation samples, the running energy of that window
/// and the step bookkeeping. Updates start once the history is full.
#[derive(Debug, Clone)]
pub struct NlmsFilter {
    params: NlmsParams,
    coefficients: Vec<f64>,
    history: Vec<f64>,
    pos: usize,
    energy: f64,
    samples_seen: usize,
    updates: usize,
}

impl NlmsFilter {
    /// Create a filter with zeroed coefficients.
    pub fn new(params: NlmsParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            coefficients: vec![0.0; params.memory_size],
            history: vec![0.0; params.memory_size],
            pos: 0,
            energy: 0.0,
            samples_seen: 0,
            updates: 0,
        })
    }

    /// Feed one time step.
    ///
    /// Returns `None` while the window is still filling, otherwise the
    /// prediction `y[t]` and the error `e[t] = d[t] - y[t]` computed before the
    /// coefficients were updated.
    pub fn process_sample(&mut self, input: f64, desired: f64) -> Option<(f64, f64)> {
        let order = self.params.memory_size;
        let newest = self.pos;

        let oldest = self.history[newest];
        self.history[newest] = input;
        self.energy += input * input - oldest * oldest;

        self.pos = (self.pos + 1) % order;
        if self.pos == 0 {
            // Resync once per wrap so rounding in the running sum cannot drift.
            self.energy = self.history.iter().map(|&x| x * x).sum();
        }
        self.energy = self.energy.max(0.0);
        self.samples_seen += 1;

        if self.samples_seen < order {
            return None;
        }

        // Coefficient k pairs with x[t-k]: the history slice up to `newest`
        // read backwards, then the wrapped tail read backwards.
        let (recent, older) = self.history.split_at(newest + 1);
        let (c_recent, c_older) = self.coefficients.split_at_mut(newest + 1);

        let output: f64 = c_recent
            .iter()
            .zip(recent.iter().rev())
            .chain(c_older.iter().zip(older.iter().rev()))
            .map(|(&w, &x)| w * x)
            .sum();

        let error = desired - output;
        let gain = self.params.step_size * error / (self.params.regularization + self.energy);

        for (w, &x) in c_recent
            .iter_mut()
            .zip(recent.iter().rev())
            .chain(c_older.iter_mut().zip(older.iter().rev()))
        {
            *w += gain * x;
        }

        self.updates += 1;
        Some((output, error))
    }

    /// Current coefficient vector (the impulse response estimate).
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Consume the filter and return its coefficients.
    pub fn into_coefficients(self) -> Vec<f64> {
        self.coefficients
    }

    /// Energy `xᵀx` of the current window.
    pub fn window_energy(&self) -> f64 {
        self.energy
    }

    /// Number of coefficient updates applied so far.
    pub fn updates(&self) -> usize {
        self.updates
    }

    /// Filter parameters.
    pub fn params(&self) -> &NlmsParams {
        &self.params
    }

    /// Zero coefficients, history and bookkeeping. Parameters are preserved.
    pub fn reset(&mut self) {
        self.coefficients.fill(0.0);
        self.history.fill(0.0);
        self.pos = 0;
        self.energy = 0.0;
        self.samples_seen = 0;
        self.updates = 0;
    }
}

/// Estimate the impulse response between `excitation` and `response`.
///
/// Runs a fresh [`NlmsFilter`] over the full, time-aligned sequences and
/// returns its `memory_size` coefficients. Both sequences must have the same
/// length and hold at least `memory_size` samples.
pub fn run(excitation: &[f64], response: &[f64], params: &NlmsParams) -> Result<Vec<f64>> {
    params.validate()?;
    if excitation.len() != response.len() {
        return Err(Error::LengthMismatch {
            what: "excitation/response",
            left: excitation.len(),
            right: response.len(),
        });
    }
    if excitation.len() < params.memory_size {
        return Err(Error::InsufficientSamples {
            len: excitation.len(),
            memory_size: params.memory_size,
        });
    }

    let mut filter = NlmsFilter::new(*params)?;
    for (&x, &d) in excitation.iter().zip(response) {
        filter.process_sample(x, d);
    }
    Ok(filter.into_coefficients())
}

/// Subtract the arithmetic mean from a signal.
pub fn remove_mean(signal: &[f64]) -> Vec<f64> {
    if signal.is_empty() {
        return Vec::new();
    }
    let mean = signal.iter().sum::<f64>() / signal.len() as f64;
    signal.iter().map(|&x| x - mean).collect()
}
