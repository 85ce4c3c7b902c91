//! Multi-qubit gate kernels
//!
//! Three families share the gather/scatter contraction:
//!
//! - the generic path walks an outer counter over the untouched qubits and
//!   resolves amplitude indices through the bit-index generator, with a
//!   compile-time-arity variant whose scratch lives on the stack and a
//!   runtime-arity variant for six targets and up;
//! - the strided path for two to five targets reshapes the operator to
//!   ascending target order once and then runs a nested loop over the
//!   sorted-target strides, reaching amplitudes by a precomputed offset
//!   table so the innermost loop is branch-free with stride one;
//! - the diagonal path multiplies in place and needs no scratch at all.

use num_complex::Complex64;
use rayon::prelude::*;
use smallvec::{smallvec, SmallVec};

use qvec_core::indexing::{fill_indexes, indexes, offset_masks, DynIndexes};

use super::parallel_chunk;

/// Apply a dense operator with compile-time arity; `D` must equal 2^k.
pub fn apply_dense_static<const D: usize>(
    state: &mut [Complex64],
    targets: &[usize],
    sorted: &[usize],
    mat: &[Complex64],
    parallel: bool,
) {
    debug_assert_eq!(D, 1 << targets.len());
    debug_assert_eq!(mat.len(), D * D);

    if parallel {
        state
            .par_chunks_mut(parallel_chunk(sorted[sorted.len() - 1]))
            .for_each(|chunk| dense_static_block::<D>(chunk, targets, sorted, mat));
    } else {
        dense_static_block::<D>(state, targets, sorted, mat);
    }
}

fn dense_static_block<const D: usize>(
    block: &mut [Complex64],
    targets: &[usize],
    sorted: &[usize],
    mat: &[Complex64],
) {
    let k = targets.len();
    for j in 0..block.len() >> k {
        let inds = indexes::<D>(targets, sorted, j);

        let mut cache = [Complex64::new(0.0, 0.0); D];
        for (c, &idx) in inds.iter().enumerate() {
            cache[c] = block[idx];
            block[idx] = Complex64::new(0.0, 0.0);
        }
        for (i, &idx) in inds.iter().enumerate() {
            for (c, amp) in cache.iter().enumerate() {
                block[idx] += mat[i + D * c] * amp;
            }
        }
    }
}

/// Apply a dense operator with runtime arity.
pub fn apply_dense_dynamic(
    state: &mut [Complex64],
    targets: &[usize],
    sorted: &[usize],
    mat: &[Complex64],
    parallel: bool,
) {
    debug_assert_eq!(mat.len(), 1 << (2 * targets.len()));

    if parallel {
        state
            .par_chunks_mut(parallel_chunk(sorted[sorted.len() - 1]))
            .for_each(|chunk| dense_dynamic_block(chunk, targets, sorted, mat));
    } else {
        dense_dynamic_block(state, targets, sorted, mat);
    }
}

fn dense_dynamic_block(
    block: &mut [Complex64],
    targets: &[usize],
    sorted: &[usize],
    mat: &[Complex64],
) {
    let k = targets.len();
    let dim = 1 << k;

    // One scratch pair per block, refilled each outer iteration.
    let mut inds: DynIndexes = smallvec![0; dim];
    let mut cache: SmallVec<[Complex64; 32]> = smallvec![Complex64::new(0.0, 0.0); dim];

    for j in 0..block.len() >> k {
        fill_indexes(targets, sorted, j, &mut inds);

        for c in 0..dim {
            cache[c] = block[inds[c]];
            block[inds[c]] = Complex64::new(0.0, 0.0);
        }
        for i in 0..dim {
            let idx = inds[i];
            for c in 0..dim {
                block[idx] += mat[i + dim * c] * cache[c];
            }
        }
    }
}

/// Apply a diagonal operator of any arity: amplitude `idx_m` picks up
/// `diag[m]`, labelled in caller target order.
pub fn apply_diagonal(
    state: &mut [Complex64],
    targets: &[usize],
    sorted: &[usize],
    diag: &[Complex64],
    parallel: bool,
) {
    debug_assert_eq!(diag.len(), 1 << targets.len());

    if parallel {
        state
            .par_chunks_mut(parallel_chunk(sorted[sorted.len() - 1]))
            .for_each(|chunk| diagonal_block(chunk, targets, sorted, diag));
    } else {
        diagonal_block(state, targets, sorted, diag);
    }
}

fn diagonal_block(
    block: &mut [Complex64],
    targets: &[usize],
    sorted: &[usize],
    diag: &[Complex64],
) {
    let k = targets.len();
    let dim = 1 << k;
    let mut inds: DynIndexes = smallvec![0; dim];

    for j in 0..block.len() >> k {
        fill_indexes(targets, sorted, j, &mut inds);
        for m in 0..dim {
            block[inds[m]] *= diag[m];
        }
    }
}

/// Strided two-target kernel; `mat` must already be in ascending target
/// order (see `qvec_core::operator::sorted_operator`).
pub fn apply_dense2_sorted(
    state: &mut [Complex64],
    sorted: &[usize],
    mat: &[Complex64],
    parallel: bool,
) {
    debug_assert_eq!(mat.len(), 16);
    let step1 = 1 << sorted[0];
    let step2 = 1 << sorted[1];

    if parallel {
        state
            .par_chunks_mut(step2 * 2)
            .for_each(|chunk| dense2_block(chunk, step1, step2, mat));
    } else {
        dense2_block(state, step1, step2, mat);
    }
}

fn dense2_block(block: &mut [Complex64], step1: usize, step2: usize, mat: &[Complex64]) {
    let mut k1 = 0;
    while k1 < block.len() {
        let mut k2 = 0;
        while k2 < step2 {
            for k3 in 0..step1 {
                let t0 = k1 | k2 | k3;
                let t1 = t0 | step1;
                let t2 = t0 | step2;
                let t3 = t1 | step2;

                let p0 = block[t0];
                let p1 = block[t1];
                let p2 = block[t2];
                let p3 = block[t3];

                block[t0] = mat[0] * p0 + mat[4] * p1 + mat[8] * p2 + mat[12] * p3;
                block[t1] = mat[1] * p0 + mat[5] * p1 + mat[9] * p2 + mat[13] * p3;
                block[t2] = mat[2] * p0 + mat[6] * p1 + mat[10] * p2 + mat[14] * p3;
                block[t3] = mat[3] * p0 + mat[7] * p1 + mat[11] * p2 + mat[15] * p3;
            }
            k2 += step1 * 2;
        }
        k1 += step2 * 2;
    }
}

/// Strided three-target kernel over a sorted-order operator.
pub fn apply_dense3_sorted(
    state: &mut [Complex64],
    sorted: &[usize],
    mat: &[Complex64],
    parallel: bool,
) {
    debug_assert_eq!(mat.len(), 64);
    let steps = [1 << sorted[0], 1 << sorted[1], 1 << sorted[2]];
    let masks = offset_masks::<8>(&steps);

    if parallel {
        state
            .par_chunks_mut(steps[2] * 2)
            .for_each(|chunk| dense3_block(chunk, &steps, &masks, mat));
    } else {
        dense3_block(state, &steps, &masks, mat);
    }
}

fn dense3_block(
    block: &mut [Complex64],
    steps: &[usize; 3],
    masks: &[usize; 8],
    mat: &[Complex64],
) {
    let mut k1 = 0;
    while k1 < block.len() {
        let mut k2 = 0;
        while k2 < steps[2] {
            let mut k3 = 0;
            while k3 < steps[1] {
                for k4 in 0..steps[0] {
                    contract_masked::<8>(block, k1 | k2 | k3 | k4, masks, mat);
                }
                k3 += steps[0] * 2;
            }
            k2 += steps[1] * 2;
        }
        k1 += steps[2] * 2;
    }
}

/// Strided four-target kernel over a sorted-order operator.
pub fn apply_dense4_sorted(
    state: &mut [Complex64],
    sorted: &[usize],
    mat: &[Complex64],
    parallel: bool,
) {
    debug_assert_eq!(mat.len(), 256);
    let steps = [
        1 << sorted[0],
        1 << sorted[1],
        1 << sorted[2],
        1 << sorted[3],
    ];
    let masks = offset_masks::<16>(&steps);

    if parallel {
        state
            .par_chunks_mut(steps[3] * 2)
            .for_each(|chunk| dense4_block(chunk, &steps, &masks, mat));
    } else {
        dense4_block(state, &steps, &masks, mat);
    }
}

fn dense4_block(
    block: &mut [Complex64],
    steps: &[usize; 4],
    masks: &[usize; 16],
    mat: &[Complex64],
) {
    let mut k1 = 0;
    while k1 < block.len() {
        let mut k2 = 0;
        while k2 < steps[3] {
            let mut k3 = 0;
            while k3 < steps[2] {
                let mut k4 = 0;
                while k4 < steps[1] {
                    for k5 in 0..steps[0] {
                        contract_masked::<16>(block, k1 | k2 | k3 | k4 | k5, masks, mat);
                    }
                    k4 += steps[0] * 2;
                }
                k3 += steps[1] * 2;
            }
            k2 += steps[2] * 2;
        }
        k1 += steps[3] * 2;
    }
}

/// Strided five-target kernel over a sorted-order operator.
pub fn apply_dense5_sorted(
    state: &mut [Complex64],
    sorted: &[usize],
    mat: &[Complex64],
    parallel: bool,
) {
    debug_assert_eq!(mat.len(), 1024);
    let steps = [
        1 << sorted[0],
        1 << sorted[1],
        1 << sorted[2],
        1 << sorted[3],
        1 << sorted[4],
    ];
    let masks = offset_masks::<32>(&steps);

    if parallel {
        state
            .par_chunks_mut(steps[4] * 2)
            .for_each(|chunk| dense5_block(chunk, &steps, &masks, mat));
    } else {
        dense5_block(state, &steps, &masks, mat);
    }
}

fn dense5_block(
    block: &mut [Complex64],
    steps: &[usize; 5],
    masks: &[usize; 32],
    mat: &[Complex64],
) {
    let mut k1 = 0;
    while k1 < block.len() {
        let mut k2 = 0;
        while k2 < steps[4] {
            let mut k3 = 0;
            while k3 < steps[3] {
                let mut k4 = 0;
                while k4 < steps[2] {
                    let mut k5 = 0;
                    while k5 < steps[1] {
                        for k6 in 0..steps[0] {
                            contract_masked::<32>(
                                block,
                                k1 | k2 | k3 | k4 | k5 | k6,
                                masks,
                                mat,
                            );
                        }
                        k5 += steps[0] * 2;
                    }
                    k4 += steps[1] * 2;
                }
                k3 += steps[2] * 2;
            }
            k2 += steps[3] * 2;
        }
        k1 += steps[4] * 2;
    }
}

/// Gather the 2^k amplitudes of one block, zero them, and scatter the
/// column-major contraction back.
#[inline]
fn contract_masked<const D: usize>(
    block: &mut [Complex64],
    base: usize,
    masks: &[usize; D],
    mat: &[Complex64],
) {
    let mut psi = [Complex64::new(0.0, 0.0); D];
    for (m, &mask) in masks.iter().enumerate() {
        psi[m] = block[base | mask];
        block[base | mask] = Complex64::new(0.0, 0.0);
    }
    for (i, &mask) in masks.iter().enumerate() {
        let idx = base | mask;
        for (c, amp) in psi.iter().enumerate() {
            block[idx] += mat[c * D + i] * amp;
        }
    }
}
