//! Benchmarks for gate application and reductions
//!
//! Compares the generic gather/scatter path against the strided
//! sorted-order kernels across register sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use num_complex::Complex64;
use qvec_state::StateVector;

fn hadamard() -> Vec<Complex64> {
    let h = std::f64::consts::FRAC_1_SQRT_2;
    vec![
        Complex64::new(h, 0.0),
        Complex64::new(h, 0.0),
        Complex64::new(h, 0.0),
        Complex64::new(-h, 0.0),
    ]
}

fn random_matrix(dim: usize) -> Vec<Complex64> {
    // Deterministic pseudo-random entries are enough for throughput runs.
    (0..dim * dim)
        .map(|i| {
            let x = (i as f64 * 0.7368) % 1.0;
            Complex64::new(x - 0.5, 0.5 - (x * 1.3) % 1.0)
        })
        .collect()
}

fn bench_single_qubit(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_qubit_gate");
    let mat = hadamard();

    for num_qubits in [12usize, 16, 20] {
        group.throughput(Throughput::Elements(1u64 << num_qubits));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_qubits),
            &num_qubits,
            |b, &num_qubits| {
                let mut state = StateVector::new(num_qubits).unwrap();
                state.initialize();
                b.iter(|| {
                    state.apply_matrix(black_box(&[0]), &mat).unwrap();
                });
            },
        );
    }
    group.finish();
}

fn bench_three_qubit_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("three_qubit_gate");
    let mat = random_matrix(8);
    let targets = [5usize, 0, 3];

    for num_qubits in [12usize, 16, 20] {
        group.throughput(Throughput::Elements(1u64 << num_qubits));

        group.bench_with_input(
            BenchmarkId::new("generic", num_qubits),
            &num_qubits,
            |b, &num_qubits| {
                let mut state = StateVector::new(num_qubits).unwrap();
                state.initialize();
                state.configure(1, 16, false);
                b.iter(|| {
                    state.apply_matrix(black_box(&targets), &mat).unwrap();
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("strided", num_qubits),
            &num_qubits,
            |b, &num_qubits| {
                let mut state = StateVector::new(num_qubits).unwrap();
                state.initialize();
                state.configure(1, 16, true);
                b.iter(|| {
                    state.apply_matrix(black_box(&targets), &mat).unwrap();
                });
            },
        );
    }
    group.finish();
}

fn bench_reductions(c: &mut Criterion) {
    let mut group = c.benchmark_group("reductions");
    let mat = random_matrix(4);
    let targets = [7usize, 2];

    for num_qubits in [12usize, 16, 20] {
        group.throughput(Throughput::Elements(1u64 << num_qubits));

        group.bench_with_input(
            BenchmarkId::new("norm", num_qubits),
            &num_qubits,
            |b, &num_qubits| {
                let mut state = StateVector::new(num_qubits).unwrap();
                state.initialize_plus();
                b.iter(|| black_box(state.norm()));
            },
        );

        group.bench_with_input(
            BenchmarkId::new("expectation", num_qubits),
            &num_qubits,
            |b, &num_qubits| {
                let mut state = StateVector::new(num_qubits).unwrap();
                state.initialize_plus();
                b.iter(|| black_box(state.expectation_value(&targets, &mat).unwrap()));
            },
        );
    }
    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");

    for num_qubits in [10usize, 14] {
        let mut state = StateVector::new(num_qubits).unwrap();
        state.initialize_plus();
        let rnds: Vec<f64> = (0..1024).map(|i| i as f64 / 1024.0).collect();

        group.throughput(Throughput::Elements(rnds.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_qubits),
            &num_qubits,
            |b, _| {
                b.iter(|| black_box(state.sample_measure(&rnds)));
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_single_qubit,
    bench_three_qubit_paths,
    bench_reductions,
    bench_sampling
);
criterion_main!(benches);
