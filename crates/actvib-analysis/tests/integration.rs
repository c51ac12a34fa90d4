//! Integration tests for actvib-analysis.
//!
//! Exercises the full FIR → spectrum → resonance chain on synthetic signals
//! with known structure.

use actvib_analysis::{
    NlmsParams, PeakConfig, Spectrum, find_resonances, nlms, spectrum_resonances,
};
use std::f64::consts::PI;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Xorshift noise in [-1, 1].
fn noise(len: usize, seed: u32) -> Vec<f64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            f64::from(state as i32) / f64::from(i32::MAX)
        })
        .collect()
}

/// Causal FIR convolution.
fn convolve(signal: &[f64], taps: &[f64]) -> Vec<f64> {
    (0..signal.len())
        .map(|n| {
            taps.iter()
                .enumerate()
                .filter(|(k, _)| n >= *k)
                .map(|(k, &tap)| tap * signal[n - k])
                .sum()
        })
        .collect()
}

/// Impulse response of a decaying two-mode structure.
fn two_mode_ir(len: usize, sample_rate: f64, modes: &[(f64, f64)]) -> Vec<f64> {
    (0..len)
        .map(|n| {
            let t = n as f64 / sample_rate;
            modes
                .iter()
                .map(|&(freq, decay)| (-decay * t).exp() * (2.0 * PI * freq * t).sin())
                .sum()
        })
        .collect()
}

// ===========================================================================
// 1. Impulse-response recovery
// ===========================================================================

#[test]
fn impulse_train_recovers_three_taps() {
    let taps = [0.5, -0.3, 0.1];
    let period = 64;

    let excitation: Vec<f64> = (0..4096)
        .map(|n| if n % period == 0 { 1.0 } else { 0.0 })
        .collect();
    let jitter = noise(4096, 0xACE1);
    let response: Vec<f64> = convolve(&excitation, &taps)
        .iter()
        .zip(&jitter)
        .map(|(y, j)| y + 1e-6 * j)
        .collect();

    let coeffs = nlms::run(&excitation, &response, &NlmsParams::new(64)).unwrap();

    assert_eq!(coeffs.len(), 64);
    for (k, &tap) in taps.iter().enumerate() {
        assert!(
            (coeffs[k] - tap).abs() < 1e-2,
            "tap {k}: got {:.5}, expected {tap}",
            coeffs[k]
        );
    }
    for (k, &w) in coeffs.iter().enumerate().skip(taps.len()) {
        assert!(w.abs() < 1e-2, "tap {k} should be ~0, got {w:.5}");
    }
}

#[test]
fn shorter_than_memory_is_precondition_error() {
    let x = noise(100, 3);
    let err = nlms::run(&x, &x, &NlmsParams::default()).unwrap_err();
    assert!(err.is_precondition(), "unexpected error: {err}");
}

// ===========================================================================
// 2. Spectrum
// ===========================================================================

#[test]
fn spectrum_dc_matches_coefficient_sum() {
    let coeffs = noise(2000, 11);
    let spectrum = Spectrum::from_coefficients(&coeffs, 416.0).unwrap();
    let sum: f64 = coeffs.iter().sum();
    assert!((spectrum.magnitude()[0] - sum.abs()).abs() < 1e-9);
}

#[test]
fn spectrum_is_deterministic() {
    let coeffs = noise(500, 5);
    let a = Spectrum::from_coefficients(&coeffs, 416.0).unwrap();
    let b = Spectrum::from_coefficients(&coeffs, 416.0).unwrap();
    assert_eq!(a, b);
}

// ===========================================================================
// 3. End-to-end: modes of a synthetic structure
// ===========================================================================

#[test]
fn resonances_of_two_mode_structure() {
    let sample_rate = 416.0;
    let memory = 512;
    let ir = two_mode_ir(memory, sample_rate, &[(40.0, 3.0), (120.0, 4.0)]);

    let excitation = noise(20_000, 0xBEEF);
    let response = convolve(&excitation, &ir);

    let fir = nlms::run(&excitation, &response, &NlmsParams::new(memory).with_step_size(0.8))
        .unwrap();
    let spectrum = Spectrum::from_coefficients(&fir, sample_rate).unwrap();

    let config = PeakConfig::default().with_prominence(10.0);
    let resonances = spectrum_resonances(&spectrum, &config).unwrap();

    let found: Vec<f64> = resonances.iter().map(|r| r.frequency).collect();
    assert_eq!(found.len(), 2, "resonances: {found:?}");
    assert!((found[0] - 40.0).abs() < 2.0, "first mode at {}", found[0]);
    assert!((found[1] - 120.0).abs() < 2.0, "second mode at {}", found[1]);
}

#[test]
fn close_peaks_report_only_taller() {
    let mut magnitude = vec![0.0; 100];
    magnitude[40] = 100.0;
    magnitude[44] = 80.0;
    let frequency: Vec<f64> = (0..100).map(|i| i as f64).collect();

    let resonances = find_resonances(&magnitude, &frequency, &PeakConfig::default()).unwrap();

    assert_eq!(resonances.len(), 1);
    assert_eq!(resonances[0].index, 40);
    assert_eq!(resonances[0].amplitude, 100.0);

    let loose = PeakConfig::default().with_min_distance(2);
    let resonances = find_resonances(&magnitude, &frequency, &loose).unwrap();
    assert_eq!(resonances.len(), 2);
}
