//! Two-qubit fast-path kernels
//!
//! CNOT, CZ and SWAP act by permuting or phasing amplitudes selected with
//! bit masks, so no 4x4 contraction is needed. The mask predicates are
//! position-independent, which lets the same block body serve the whole
//! state sequentially and each `par_chunks_mut` chunk in parallel.

use num_complex::Complex64;
use rayon::prelude::*;

use super::parallel_chunk;

/// Controlled-NOT: where the control bit is set, swap the two amplitudes
/// differing in the target bit.
pub fn apply_cnot(state: &mut [Complex64], control: usize, target: usize, parallel: bool) {
    debug_assert_ne!(control, target);
    let control_mask = 1 << control;
    let target_mask = 1 << target;

    if parallel {
        state
            .par_chunks_mut(parallel_chunk(control.max(target)))
            .for_each(|chunk| cnot_block(chunk, control_mask, target_mask));
    } else {
        cnot_block(state, control_mask, target_mask);
    }
}

#[inline]
fn cnot_block(block: &mut [Complex64], control_mask: usize, target_mask: usize) {
    for i in 0..block.len() {
        if i & control_mask != 0 && i & target_mask == 0 {
            block.swap(i, i | target_mask);
        }
    }
}

/// Controlled-Z: negate the amplitudes with both bits set.
pub fn apply_cz(state: &mut [Complex64], qubit_a: usize, qubit_b: usize, parallel: bool) {
    debug_assert_ne!(qubit_a, qubit_b);
    let both_mask = (1 << qubit_a) | (1 << qubit_b);

    if parallel {
        state
            .par_chunks_mut(parallel_chunk(qubit_a.max(qubit_b)))
            .for_each(|chunk| cz_block(chunk, both_mask));
    } else {
        cz_block(state, both_mask);
    }
}

#[inline]
fn cz_block(block: &mut [Complex64], both_mask: usize) {
    for i in 0..block.len() {
        if i & both_mask == both_mask {
            block[i] = -block[i];
        }
    }
}

/// SWAP: exchange the amplitudes whose two target bits differ.
pub fn apply_swap(state: &mut [Complex64], qubit_a: usize, qubit_b: usize, parallel: bool) {
    debug_assert_ne!(qubit_a, qubit_b);
    let mask_a = 1 << qubit_a;
    let mask_b = 1 << qubit_b;

    if parallel {
        state
            .par_chunks_mut(parallel_chunk(qubit_a.max(qubit_b)))
            .for_each(|chunk| swap_block(chunk, mask_a, mask_b));
    } else {
        swap_block(state, mask_a, mask_b);
    }
}

#[inline]
fn swap_block(block: &mut [Complex64], mask_a: usize, mask_b: usize) {
    for i in 0..block.len() {
        if i & mask_a != 0 && i & mask_b == 0 {
            block.swap(i, (i ^ mask_a) | mask_b);
        }
    }
}
