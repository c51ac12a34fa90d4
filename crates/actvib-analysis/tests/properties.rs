//! Property-based tests for the analysis pipeline.
//!
//! Covers filter stability under arbitrary finite input, the zero-excitation
//! invariant, and the DC identity of the spectral transform.

use actvib_analysis::{NlmsParams, PeakConfig, Spectrum, find_resonances, nlms};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any finite excitation/response pair the estimated coefficients
    /// stay finite.
    #[test]
    fn nlms_coefficients_stay_finite(
        pairs in prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 16..256),
        memory in 1usize..16,
        step in 0.01f64..1.99,
    ) {
        let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let params = NlmsParams::new(memory).with_step_size(step);
        let coeffs = nlms::run(&x, &y, &params).unwrap();
        prop_assert_eq!(coeffs.len(), memory);
        prop_assert!(coeffs.iter().all(|w| w.is_finite()), "non-finite coefficients: {:?}", coeffs);
    }

    /// A silent excitation never moves the coefficients.
    #[test]
    fn zero_excitation_yields_zero_coefficients(
        response in prop::collection::vec(-1e6f64..1e6, 32..200),
        memory in 1usize..32,
    ) {
        let excitation = vec![0.0; response.len()];
        let coeffs = nlms::run(&excitation, &response, &NlmsParams::new(memory)).unwrap();
        prop_assert!(coeffs.iter().all(|&w| w == 0.0));
    }

    /// The DC bin equals the absolute value of the coefficient sum.
    #[test]
    fn spectrum_dc_is_abs_sum(
        coeffs in prop::collection::vec(-100.0f64..100.0, 1..512),
        sample_rate in 1.0f64..10_000.0,
    ) {
        let spectrum = Spectrum::from_coefficients(&coeffs, sample_rate).unwrap();
        let sum: f64 = coeffs.iter().sum();
        prop_assert!((spectrum.magnitude()[0] - sum.abs()).abs() < 1e-6);
        prop_assert_eq!(spectrum.len(), coeffs.len() / 2 + 1);
    }

    /// Reported peaks are sorted and at least `min_distance` apart.
    #[test]
    fn resonances_sorted_and_separated(
        magnitude in prop::collection::vec(0.0f64..500.0, 3..300),
        min_distance in 1usize..20,
    ) {
        let frequency: Vec<f64> = (0..magnitude.len()).map(|i| i as f64).collect();
        let config = PeakConfig::default().with_min_distance(min_distance).with_prominence(0.0);
        let peaks = find_resonances(&magnitude, &frequency, &config).unwrap();
        for pair in peaks.windows(2) {
            prop_assert!(pair[0].index < pair[1].index);
            if min_distance > 1 {
                prop_assert!(pair[1].index - pair[0].index >= min_distance);
            }
        }
    }
}
