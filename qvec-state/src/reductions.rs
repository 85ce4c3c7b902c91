//! Reduction kernels
//!
//! Norms, inner products, probabilities and expectation values all walk the
//! state with the same outer counter the gate kernels use, but accumulate a
//! scalar instead of writing back. Parallel runs reduce per-chunk partials
//! by associative addition; complex totals are carried as separate real and
//! imaginary sums.

use num_complex::Complex64;
use rayon::prelude::*;
use smallvec::smallvec;

use qvec_core::indexing::{fill_indexes, DynIndexes};

use crate::kernels::parallel_chunk;

#[inline]
fn add_pairs(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    (a.0 + b.0, a.1 + b.1)
}

/// Squared norm of the state.
pub(crate) fn norm(state: &[Complex64], parallel: bool) -> f64 {
    if parallel {
        state.par_iter().map(|a| a.norm_sqr()).sum()
    } else {
        state.iter().map(|a| a.norm_sqr()).sum()
    }
}

/// Plain dot product without conjugation.
pub(crate) fn dot(a: &[Complex64], b: &[Complex64], parallel: bool) -> Complex64 {
    debug_assert_eq!(a.len(), b.len());
    let (re, im) = if parallel {
        a.par_iter()
            .zip(b.par_iter())
            .map(|(x, y)| {
                let z = x * y;
                (z.re, z.im)
            })
            .reduce(|| (0.0, 0.0), add_pairs)
    } else {
        a.iter().zip(b.iter()).fold((0.0, 0.0), |acc, (x, y)| {
            let z = x * y;
            add_pairs(acc, (z.re, z.im))
        })
    };
    Complex64::new(re, im)
}

/// Inner product with the second argument conjugated.
pub(crate) fn inner_product(a: &[Complex64], b: &[Complex64], parallel: bool) -> Complex64 {
    debug_assert_eq!(a.len(), b.len());
    let (re, im) = if parallel {
        a.par_iter()
            .zip(b.par_iter())
            .map(|(x, y)| {
                let z = x * y.conj();
                (z.re, z.im)
            })
            .reduce(|| (0.0, 0.0), add_pairs)
    } else {
        a.iter().zip(b.iter()).fold((0.0, 0.0), |acc, (x, y)| {
            let z = x * y.conj();
            add_pairs(acc, (z.re, z.im))
        })
    };
    Complex64::new(re, im)
}

/// Squared modulus of every amplitude.
pub(crate) fn all_probabilities(state: &[Complex64], parallel: bool) -> Vec<f64> {
    if parallel {
        state.par_iter().map(|a| a.norm_sqr()).collect()
    } else {
        state.iter().map(|a| a.norm_sqr()).collect()
    }
}

/// Measurement outcome distribution on a target subset, outcome bits in
/// caller target order.
pub(crate) fn target_probabilities(
    state: &[Complex64],
    targets: &[usize],
    sorted: &[usize],
    parallel: bool,
) -> Vec<f64> {
    let dim = 1 << targets.len();
    if parallel {
        state
            .par_chunks(parallel_chunk(sorted[sorted.len() - 1]))
            .map(|chunk| target_probabilities_block(chunk, targets, sorted))
            .reduce(
                || vec![0.0; dim],
                |mut acc, partial| {
                    for (a, p) in acc.iter_mut().zip(partial) {
                        *a += p;
                    }
                    acc
                },
            )
    } else {
        target_probabilities_block(state, targets, sorted)
    }
}

fn target_probabilities_block(block: &[Complex64], targets: &[usize], sorted: &[usize]) -> Vec<f64> {
    let k = targets.len();
    let dim = 1 << k;
    let mut probs = vec![0.0; dim];
    let mut inds: DynIndexes = smallvec![0; dim];

    for j in 0..block.len() >> k {
        fill_indexes(targets, sorted, j, &mut inds);
        for (m, &idx) in inds.iter().enumerate() {
            probs[m] += block[idx].norm_sqr();
        }
    }
    probs
}

/// Probability that measuring the targets yields `outcome`, summed over the
/// untouched qubits.
pub(crate) fn marginal_probability(
    state: &[Complex64],
    targets: &[usize],
    sorted: &[usize],
    outcome: usize,
    parallel: bool,
) -> f64 {
    if parallel {
        state
            .par_chunks(parallel_chunk(sorted[sorted.len() - 1]))
            .map(|chunk| marginal_probability_block(chunk, targets, sorted, outcome))
            .sum()
    } else {
        marginal_probability_block(state, targets, sorted, outcome)
    }
}

fn marginal_probability_block(
    block: &[Complex64],
    targets: &[usize],
    sorted: &[usize],
    outcome: usize,
) -> f64 {
    let k = targets.len();
    let dim = 1 << k;
    let mut inds: DynIndexes = smallvec![0; dim];
    let mut p = 0.0;

    for j in 0..block.len() >> k {
        fill_indexes(targets, sorted, j, &mut inds);
        p += block[inds[outcome]].norm_sqr();
    }
    p
}

/// Squared norm of the state a dense operator would produce, without
/// materializing it.
pub(crate) fn norm_applied_dense(
    state: &[Complex64],
    targets: &[usize],
    sorted: &[usize],
    mat: &[Complex64],
    parallel: bool,
) -> f64 {
    if parallel {
        state
            .par_chunks(parallel_chunk(sorted[sorted.len() - 1]))
            .map(|chunk| norm_applied_dense_block(chunk, targets, sorted, mat))
            .sum()
    } else {
        norm_applied_dense_block(state, targets, sorted, mat)
    }
}

fn norm_applied_dense_block(
    block: &[Complex64],
    targets: &[usize],
    sorted: &[usize],
    mat: &[Complex64],
) -> f64 {
    let k = targets.len();
    let dim = 1 << k;
    let mut inds: DynIndexes = smallvec![0; dim];
    let mut val = 0.0;

    for j in 0..block.len() >> k {
        fill_indexes(targets, sorted, j, &mut inds);
        for i in 0..dim {
            let mut vi = Complex64::new(0.0, 0.0);
            for c in 0..dim {
                vi += mat[i + dim * c] * block[inds[c]];
            }
            val += vi.norm_sqr();
        }
    }
    val
}

/// Squared norm of the state a diagonal operator would produce.
pub(crate) fn norm_applied_diagonal(
    state: &[Complex64],
    targets: &[usize],
    sorted: &[usize],
    diag: &[Complex64],
    parallel: bool,
) -> f64 {
    if parallel {
        state
            .par_chunks(parallel_chunk(sorted[sorted.len() - 1]))
            .map(|chunk| norm_applied_diagonal_block(chunk, targets, sorted, diag))
            .sum()
    } else {
        norm_applied_diagonal_block(state, targets, sorted, diag)
    }
}

fn norm_applied_diagonal_block(
    block: &[Complex64],
    targets: &[usize],
    sorted: &[usize],
    diag: &[Complex64],
) -> f64 {
    let k = targets.len();
    let dim = 1 << k;
    let mut inds: DynIndexes = smallvec![0; dim];
    let mut val = 0.0;

    for j in 0..block.len() >> k {
        fill_indexes(targets, sorted, j, &mut inds);
        for (m, &idx) in inds.iter().enumerate() {
            val += (diag[m] * block[idx]).norm_sqr();
        }
    }
    val
}

/// Expectation value of a dense operator.
pub(crate) fn expectation_dense(
    state: &[Complex64],
    targets: &[usize],
    sorted: &[usize],
    mat: &[Complex64],
    parallel: bool,
) -> Complex64 {
    let (re, im) = if parallel {
        state
            .par_chunks(parallel_chunk(sorted[sorted.len() - 1]))
            .map(|chunk| expectation_dense_block(chunk, targets, sorted, mat))
            .reduce(|| (0.0, 0.0), add_pairs)
    } else {
        expectation_dense_block(state, targets, sorted, mat)
    };
    Complex64::new(re, im)
}

fn expectation_dense_block(
    block: &[Complex64],
    targets: &[usize],
    sorted: &[usize],
    mat: &[Complex64],
) -> (f64, f64) {
    let k = targets.len();
    let dim = 1 << k;
    let mut inds: DynIndexes = smallvec![0; dim];
    let (mut re, mut im) = (0.0, 0.0);

    for j in 0..block.len() >> k {
        fill_indexes(targets, sorted, j, &mut inds);
        for i in 0..dim {
            let mut vi = Complex64::new(0.0, 0.0);
            for c in 0..dim {
                vi += mat[i + dim * c] * block[inds[c]];
            }
            let val = vi * block[inds[i]].conj();
            re += val.re;
            im += val.im;
        }
    }
    (re, im)
}

/// Expectation value of a diagonal operator.
pub(crate) fn expectation_diagonal(
    state: &[Complex64],
    targets: &[usize],
    sorted: &[usize],
    diag: &[Complex64],
    parallel: bool,
) -> Complex64 {
    let (re, im) = if parallel {
        state
            .par_chunks(parallel_chunk(sorted[sorted.len() - 1]))
            .map(|chunk| expectation_diagonal_block(chunk, targets, sorted, diag))
            .reduce(|| (0.0, 0.0), add_pairs)
    } else {
        expectation_diagonal_block(state, targets, sorted, diag)
    };
    Complex64::new(re, im)
}

fn expectation_diagonal_block(
    block: &[Complex64],
    targets: &[usize],
    sorted: &[usize],
    diag: &[Complex64],
) -> (f64, f64) {
    let k = targets.len();
    let dim = 1 << k;
    let mut inds: DynIndexes = smallvec![0; dim];
    let (mut re, mut im) = (0.0, 0.0);

    for j in 0..block.len() >> k {
        fill_indexes(targets, sorted, j, &mut inds);
        for (m, &idx) in inds.iter().enumerate() {
            let cache = block[idx];
            let val = diag[m] * cache * cache.conj();
            re += val.re;
            im += val.im;
        }
    }
    (re, im)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn plus_state(num_qubits: usize) -> Vec<Complex64> {
        let dim = 1 << num_qubits;
        vec![Complex64::new(1.0 / (dim as f64).sqrt(), 0.0); dim]
    }

    #[test]
    fn norm_of_uniform_state_is_one() {
        assert_abs_diff_eq!(norm(&plus_state(4), false), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(norm(&plus_state(4), true), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn dot_has_no_conjugation() {
        let a = vec![Complex64::new(0.0, 1.0)];
        let b = vec![Complex64::new(0.0, 1.0)];
        assert_abs_diff_eq!(dot(&a, &b, false).re, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(inner_product(&a, &b, false).re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn target_probabilities_sum_to_norm() {
        let state: Vec<Complex64> = (0..16)
            .map(|i| Complex64::new(0.1 * i as f64, 0.02 * i as f64))
            .collect();
        let targets = [2usize, 0];
        let sorted = [0usize, 2];

        let probs = target_probabilities(&state, &targets, &sorted, false);
        let total: f64 = probs.iter().sum();
        assert_abs_diff_eq!(total, norm(&state, false), epsilon = 1e-12);

        for (m, &p) in probs.iter().enumerate() {
            assert_abs_diff_eq!(
                p,
                marginal_probability(&state, &targets, &sorted, m, false),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn expectation_of_identity_is_norm() {
        let state: Vec<Complex64> = (0..8)
            .map(|i| Complex64::new((i as f64).cos(), (i as f64).sin() * 0.5))
            .collect();
        let targets = [1usize, 2];
        let sorted = [1usize, 2];
        let ident: Vec<Complex64> = vec![Complex64::new(1.0, 0.0); 4];

        let ev = expectation_diagonal(&state, &targets, &sorted, &ident, false);
        assert_abs_diff_eq!(ev.re, norm(&state, false), epsilon = 1e-12);
        assert_abs_diff_eq!(ev.im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn norm_applied_identity_preserves_norm() {
        let state: Vec<Complex64> = (0..8)
            .map(|i| Complex64::new(0.25 * i as f64, -0.125 * i as f64))
            .collect();
        let targets = [0usize, 2];
        let sorted = [0usize, 2];

        let mut ident = vec![Complex64::new(0.0, 0.0); 16];
        for i in 0..4 {
            ident[i * 4 + i] = Complex64::new(1.0, 0.0);
        }

        assert_abs_diff_eq!(
            norm_applied_dense(&state, &targets, &sorted, &ident, false),
            norm(&state, false),
            epsilon = 1e-12
        );
    }

    #[test]
    fn parallel_reductions_agree() {
        let state: Vec<Complex64> = (0..64)
            .map(|i| Complex64::new((i as f64).sin(), (i as f64).cos()))
            .collect();
        let targets = [5usize, 1];
        let sorted = [1usize, 5];
        let mat: Vec<Complex64> = (0..16)
            .map(|i| Complex64::new(0.1 * i as f64, -0.05 * i as f64))
            .collect();

        let seq = expectation_dense(&state, &targets, &sorted, &mat, false);
        let par = expectation_dense(&state, &targets, &sorted, &mat, true);
        assert_abs_diff_eq!(seq.re, par.re, epsilon = 1e-10);
        assert_abs_diff_eq!(seq.im, par.im, epsilon = 1e-10);

        assert_abs_diff_eq!(
            norm_applied_dense(&state, &targets, &sorted, &mat, false),
            norm_applied_dense(&state, &targets, &sorted, &mat, true),
            epsilon = 1e-10
        );
    }
}
