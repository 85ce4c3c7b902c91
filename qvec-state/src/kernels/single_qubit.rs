//! Single-qubit gate kernels
//!
//! A single-qubit gate pairs each amplitude with the one differing only in
//! the target bit; the pair sits `1 << qubit` apart. The dedicated X, Y and
//! Z kernels skip the 2x2 contraction entirely.

use num_complex::Complex64;
use rayon::prelude::*;

use super::parallel_chunk;

/// Apply a dense 2x2 operator, column-major `[m00, m10, m01, m11]`.
pub fn apply_dense(state: &mut [Complex64], qubit: usize, mat: &[Complex64], parallel: bool) {
    debug_assert_eq!(mat.len(), 4);
    let stride = 1 << qubit;

    if parallel {
        state
            .par_chunks_mut(parallel_chunk(qubit))
            .for_each(|chunk| dense_block(chunk, stride, mat));
    } else {
        dense_block(state, stride, mat);
    }
}

#[inline]
fn dense_block(block: &mut [Complex64], stride: usize, mat: &[Complex64]) {
    let mut base = 0;
    while base < block.len() {
        for low in base..base + stride {
            let high = low | stride;
            let a = block[low];
            let b = block[high];
            block[low] = mat[0] * a + mat[2] * b;
            block[high] = mat[1] * a + mat[3] * b;
        }
        base += stride * 2;
    }
}

/// Apply a diagonal operator `[d0, d1]`.
pub fn apply_diagonal(state: &mut [Complex64], qubit: usize, diag: &[Complex64], parallel: bool) {
    debug_assert_eq!(diag.len(), 2);
    let stride = 1 << qubit;

    if parallel {
        state
            .par_chunks_mut(parallel_chunk(qubit))
            .for_each(|chunk| diagonal_block(chunk, stride, diag));
    } else {
        diagonal_block(state, stride, diag);
    }
}

#[inline]
fn diagonal_block(block: &mut [Complex64], stride: usize, diag: &[Complex64]) {
    let mut base = 0;
    while base < block.len() {
        for low in base..base + stride {
            block[low] *= diag[0];
            block[low | stride] *= diag[1];
        }
        base += stride * 2;
    }
}

/// Pauli-X: swap each amplitude pair.
pub fn apply_x(state: &mut [Complex64], qubit: usize, parallel: bool) {
    let stride = 1 << qubit;

    if parallel {
        state
            .par_chunks_mut(parallel_chunk(qubit))
            .for_each(|chunk| x_block(chunk, stride));
    } else {
        x_block(state, stride);
    }
}

#[inline]
fn x_block(block: &mut [Complex64], stride: usize) {
    let mut base = 0;
    while base < block.len() {
        for low in base..base + stride {
            block.swap(low, low | stride);
        }
        base += stride * 2;
    }
}

/// Pauli-Y: swap each pair with the +-i phases.
pub fn apply_y(state: &mut [Complex64], qubit: usize, parallel: bool) {
    let stride = 1 << qubit;

    if parallel {
        state
            .par_chunks_mut(parallel_chunk(qubit))
            .for_each(|chunk| y_block(chunk, stride));
    } else {
        y_block(state, stride);
    }
}

#[inline]
fn y_block(block: &mut [Complex64], stride: usize) {
    let i = Complex64::new(0.0, 1.0);
    let mut base = 0;
    while base < block.len() {
        for low in base..base + stride {
            let high = low | stride;
            let cache = block[low];
            block[low] = -i * block[high];
            block[high] = i * cache;
        }
        base += stride * 2;
    }
}

/// Pauli-Z: negate the half with the target bit set.
pub fn apply_z(state: &mut [Complex64], qubit: usize, parallel: bool) {
    let stride = 1 << qubit;

    if parallel {
        state
            .par_chunks_mut(parallel_chunk(qubit))
            .for_each(|chunk| z_block(chunk, stride));
    } else {
        z_block(state, stride);
    }
}

#[inline]
fn z_block(block: &mut [Complex64], stride: usize) {
    let mut base = 0;
    while base < block.len() {
        for low in base..base + stride {
            let high = low | stride;
            block[high] = -block[high];
        }
        base += stride * 2;
    }
}
