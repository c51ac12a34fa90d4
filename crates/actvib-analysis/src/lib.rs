//! ActVib Analysis - impulse-response estimation and resonance extraction
//!
//! This crate holds the numerical core of the vibration analysis pipeline:
//!
//! - [`nlms`] - NLMS adaptive FIR filter estimating the impulse response
//!   between an actuator excitation and an accelerometer response
//! - [`fft`] - FFT wrapper over `rustfft`
//! - [`spectrum`] - Single-sided magnitude spectrum of a coefficient vector
//! - [`peaks`] - Resonance extraction by height/distance/prominence peak picking
//!
//! ## Pipeline
//!
//! ```rust
//! use actvib_analysis::{NlmsParams, PeakConfig, Spectrum, find_resonances, nlms};
//!
//! # fn main() -> actvib_analysis::Result<()> {
//! let excitation: Vec<f64> = (0..4096).map(|i| ((i * 7919) % 97) as f64 - 48.0).collect();
//! let response: Vec<f64> = excitation.iter().map(|x| 0.8 * x).collect();
//!
//! // 1. Estimate the impulse response
//! let fir = nlms::run(&excitation, &response, &NlmsParams::new(64))?;
//!
//! // 2. Move to the frequency domain (416 Hz sampling)
//! let spectrum = Spectrum::from_coefficients(&fir, 416.0)?;
//!
//! // 3. Pick resonances
//! let resonances = find_resonances(spectrum.magnitude(), spectrum.frequency(), &PeakConfig::default())?;
//! # let _ = resonances;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fft;
pub mod nlms;
pub mod peaks;
pub mod spectrum;

// Re-export main types
pub use error::{Error, Result};
pub use fft::Fft;
pub use nlms::{NlmsFilter, NlmsParams, remove_mean};
pub use peaks::{PeakConfig, Resonance, find_resonances, spectrum_resonances};
pub use spectrum::Spectrum;
