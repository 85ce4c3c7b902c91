//! Statistical checks on measurement sampling

use approx::assert_abs_diff_eq;
use num_complex::Complex64;
use qvec_state::StateVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn histogram_matches_probabilities_within_binomial_bounds() {
    let mut rng = StdRng::seed_from_u64(1234);

    let amplitudes: Vec<Complex64> = (0..32)
        .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();
    let mut state = StateVector::from_amplitudes(&amplitudes).unwrap();
    state.renormalize();

    let shots = 100_000usize;
    let rnds: Vec<f64> = (0..shots).map(|_| rng.gen_range(0.0..1.0)).collect();
    let samples = state.sample_measure(&rnds);
    assert_eq!(samples.len(), shots);

    let mut counts = vec![0usize; state.dimension()];
    for &sample in &samples {
        counts[sample] += 1;
    }

    for (outcome, &count) in counts.iter().enumerate() {
        let p = state.probability(outcome).unwrap();
        let sigma = (shots as f64 * p * (1.0 - p)).sqrt();
        let deviation = (count as f64 - shots as f64 * p).abs();
        // Four sigma keeps the joint bound over all 32 outcomes tight.
        assert!(
            deviation <= 4.0 * sigma + 1.0,
            "outcome {outcome}: count {count}, expected {:.1} +- {:.1}",
            shots as f64 * p,
            sigma
        );
    }
}

#[test]
fn uniform_state_samples_uniformly() {
    let mut state = StateVector::new(3).unwrap();
    state.initialize_plus();

    let mut rng = StdRng::seed_from_u64(99);
    let shots = 80_000usize;
    let rnds: Vec<f64> = (0..shots).map(|_| rng.gen_range(0.0..1.0)).collect();

    let mut counts = vec![0usize; 8];
    for sample in state.sample_measure(&rnds) {
        counts[sample] += 1;
    }

    let expected = shots as f64 / 8.0;
    let sigma = (shots as f64 * 0.125 * 0.875).sqrt();
    for count in counts {
        assert!((count as f64 - expected).abs() <= 4.0 * sigma);
    }
}

#[test]
fn samples_are_position_stable_under_parallelism() {
    let mut rng = StdRng::seed_from_u64(7);
    let amplitudes: Vec<Complex64> = (0..16)
        .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect();
    let mut state = StateVector::from_amplitudes(&amplitudes).unwrap();
    state.renormalize();

    let rnds: Vec<f64> = (0..5000).map(|_| rng.gen_range(0.0..1.0)).collect();

    let sequential = state.sample_measure(&rnds);
    // Sampling parallelizes on the thread budget alone.
    state.configure(8, 16, false);
    let parallel = state.sample_measure(&rnds);

    assert_eq!(sequential, parallel);
}

#[test]
fn deterministic_state_always_yields_its_outcome() {
    let mut state = StateVector::new(4).unwrap();
    state.initialize();
    state.apply_x(1).unwrap();
    state.apply_x(3).unwrap();

    // |psi> = |1010>, index 10.
    let rnds = [0.0, 0.2, 0.5, 0.8, 0.9999];
    for sample in state.sample_measure(&rnds) {
        assert_eq!(sample, 0b1010);
    }
}

#[test]
fn empirical_mean_matches_expectation() {
    // <Z> on qubit 0 estimated from samples against the exact reduction.
    let mut state = StateVector::new(2).unwrap();
    state.initialize();
    let theta = 1.1_f64;
    let ry = [
        Complex64::new((theta / 2.0).cos(), 0.0),
        Complex64::new((theta / 2.0).sin(), 0.0),
        Complex64::new(-(theta / 2.0).sin(), 0.0),
        Complex64::new((theta / 2.0).cos(), 0.0),
    ];
    state.apply_matrix(&[0], &ry).unwrap();

    let z_diag = [Complex64::new(1.0, 0.0), Complex64::new(-1.0, 0.0)];
    let exact = state.expectation_value(&[0], &z_diag).unwrap().re;

    let mut rng = StdRng::seed_from_u64(2024);
    let shots = 200_000usize;
    let rnds: Vec<f64> = (0..shots).map(|_| rng.gen_range(0.0..1.0)).collect();
    let empirical: f64 = state
        .sample_measure(&rnds)
        .into_iter()
        .map(|outcome| if outcome & 1 == 0 { 1.0 } else { -1.0 })
        .sum::<f64>()
        / shots as f64;

    assert_abs_diff_eq!(empirical, exact, epsilon = 0.02);
}
