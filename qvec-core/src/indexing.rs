//! Bit-interleaved index generation
//!
//! For a k-qubit operation on an N-qubit register the kernels iterate an
//! outer counter `j` over the 2^(N-k) configurations of the untouched
//! qubits. [`base_index`] expands `j` to a full-register index with a
//! cleared bit at every target position, and [`indexes`] /
//! [`indexes_dynamic`] attach the 2^k target-bit offsets to that base.
//!
//! Ranging `j` over [0, 2^(N-k)) and the offset over [0, 2^k) visits every
//! index in [0, 2^N) exactly once, which is what makes the per-`j` work
//! units safe to execute concurrently.

use smallvec::{smallvec, SmallVec};

/// Inline capacity for runtime-arity index sets; operations on up to five
/// targets stay on the stack.
pub const INLINE_INDEXES: usize = 32;

/// Index set for a runtime-arity operation.
pub type DynIndexes = SmallVec<[usize; INLINE_INDEXES]>;

/// Expand `j` to a full-register index by inserting a cleared bit at each
/// position in `sorted`.
///
/// `sorted` must be in ascending order; each insertion shifts the remaining
/// high bits up by one so later positions are interpreted in the already
/// widened register.
#[inline]
pub fn base_index(sorted: &[usize], j: usize) -> usize {
    let mut idx = j;
    for &q in sorted {
        let low = idx & ((1 << q) - 1);
        idx = ((idx >> q) << (q + 1)) | low;
    }
    idx
}

/// Fill `inds` with the full-register indices of the 2^k amplitudes touched
/// by outer iteration `j`.
///
/// Offsets are attached in caller order: bit r of the offset index selects
/// target `targets[r]`, so `inds[m]` is the amplitude whose target bits
/// spell `m` in the caller's target order. `sorted` must hold the same
/// qubits in ascending order.
#[inline]
pub fn fill_indexes(targets: &[usize], sorted: &[usize], j: usize, inds: &mut [usize]) {
    debug_assert_eq!(targets.len(), sorted.len());
    debug_assert_eq!(inds.len(), 1 << targets.len());

    inds[0] = base_index(sorted, j);
    for (r, &q) in targets.iter().enumerate() {
        let filled = 1 << r;
        let bit = 1 << q;
        for m in 0..filled {
            inds[filled + m] = inds[m] | bit;
        }
    }
}

/// Compile-time-arity index set: `D` must equal 2^k for k targets, so the
/// result lives on the stack.
#[inline]
pub fn indexes<const D: usize>(targets: &[usize], sorted: &[usize], j: usize) -> [usize; D] {
    let mut inds = [0; D];
    fill_indexes(targets, sorted, j, &mut inds);
    inds
}

/// Runtime-arity index set; inline up to [`INLINE_INDEXES`] entries, heap
/// beyond.
#[inline]
pub fn indexes_dynamic(targets: &[usize], sorted: &[usize], j: usize) -> DynIndexes {
    let mut inds: DynIndexes = smallvec![0; 1 << targets.len()];
    fill_indexes(targets, sorted, j, &mut inds);
    inds
}

/// Offset table for a strided kernel: entry `m` is the OR of `strides[i]`
/// over the set bits i of `m`.
///
/// With `strides[i] = 1 << sorted[i]` this is the target-bit offset of the
/// m-th amplitude within a block, labelled in sorted order.
#[inline]
pub fn offset_masks<const D: usize>(strides: &[usize]) -> [usize; D] {
    debug_assert_eq!(D, 1 << strides.len());
    let mut masks = [0; D];
    for (i, &stride) in strides.iter().enumerate() {
        let filled = 1 << i;
        for m in 0..filled {
            masks[filled + m] = masks[m] | stride;
        }
    }
    masks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_index_inserts_zero_bits() {
        // Single target at position 1: j's bits straddle the hole.
        assert_eq!(base_index(&[1], 0b0), 0b000);
        assert_eq!(base_index(&[1], 0b1), 0b001);
        assert_eq!(base_index(&[1], 0b10), 0b100);
        assert_eq!(base_index(&[1], 0b11), 0b101);
    }

    #[test]
    fn base_index_multiple_targets() {
        // Targets {0, 2}: j's two bits land at positions 1 and 3.
        assert_eq!(base_index(&[0, 2], 0b00), 0b0000);
        assert_eq!(base_index(&[0, 2], 0b01), 0b0010);
        assert_eq!(base_index(&[0, 2], 0b10), 0b1000);
        assert_eq!(base_index(&[0, 2], 0b11), 0b1010);
    }

    #[test]
    fn base_index_no_targets_is_identity() {
        assert_eq!(base_index(&[], 13), 13);
    }

    #[test]
    fn indexes_single_target() {
        let inds = indexes::<2>(&[1], &[1], 0);
        assert_eq!(inds, [0b00, 0b10]);
        let inds = indexes::<2>(&[1], &[1], 1);
        assert_eq!(inds, [0b01, 0b11]);
    }

    #[test]
    fn indexes_respects_caller_order() {
        // Targets (2, 0): offset bit 0 selects qubit 2, bit 1 selects qubit 0.
        let inds = indexes::<4>(&[2, 0], &[0, 2], 0);
        assert_eq!(inds, [0b000, 0b100, 0b001, 0b101]);
        // Sorted order for comparison.
        let inds = indexes::<4>(&[0, 2], &[0, 2], 0);
        assert_eq!(inds, [0b000, 0b001, 0b100, 0b101]);
    }

    #[test]
    fn indexes_partition_register_exactly_once() {
        // Over all j and m, every index in [0, 2^N) appears exactly once.
        let num_qubits = 6;
        for targets in [vec![0], vec![3, 1], vec![5, 0, 2]] {
            let mut sorted = targets.clone();
            sorted.sort_unstable();
            let k = targets.len();
            let mut seen = vec![0usize; 1 << num_qubits];
            for j in 0..(1 << (num_qubits - k)) {
                for idx in indexes_dynamic(&targets, &sorted, j) {
                    seen[idx] += 1;
                }
            }
            assert!(seen.iter().all(|&c| c == 1), "targets {targets:?}");
        }
    }

    #[test]
    fn dynamic_matches_static() {
        let targets = [4, 1, 3];
        let sorted = [1, 3, 4];
        for j in 0..16 {
            let st = indexes::<8>(&targets, &sorted, j);
            let dy = indexes_dynamic(&targets, &sorted, j);
            assert_eq!(&st[..], &dy[..]);
        }
    }

    #[test]
    fn offset_masks_enumerate_stride_combinations() {
        let masks = offset_masks::<8>(&[1, 4, 8]);
        assert_eq!(masks, [0, 1, 4, 5, 8, 9, 12, 13]);
    }
}
