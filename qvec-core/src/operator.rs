//! Operator layout utilities
//!
//! Dense k-qubit operators are flat column-major slices: entry (row, col)
//! lives at `col * 2^k + row`. Basis labels follow the target list, bit r of
//! a label selecting target r.
//!
//! The strided fast-path kernels traverse the register in ascending target
//! order, so an operator supplied for an arbitrary target order has to be
//! relabelled first. [`sorted_operator`] does this with simultaneous
//! row/column swaps of basis-label bits, one swap per out-of-place target.

use num_complex::Complex64;
use smallvec::SmallVec;

/// Target lists stay inline for any arity the strided kernels accept.
pub type TargetList = SmallVec<[usize; 8]>;

/// Ascending copy of a target list.
#[inline]
pub fn sorted_targets(targets: &[usize]) -> TargetList {
    let mut sorted = TargetList::from_slice(targets);
    sorted.sort_unstable();
    sorted
}

/// Swap basis-label bits `bit_a` and `bit_b` of a dim x dim column-major
/// matrix, applied simultaneously to rows and columns.
///
/// Rows (and columns) whose label has `bit_a` set and `bit_b` clear trade
/// places with the label that has the two bits flipped; labels with both
/// bits equal are fixed points.
fn swap_label_bits(bit_a: usize, bit_b: usize, mat: &mut [Complex64], dim: usize) {
    let mask_a = 1 << bit_a;
    let mask_b = 1 << bit_b;

    for first in 0..dim {
        if first & mask_a != 0 && first & mask_b == 0 {
            let second = (first ^ mask_a) | mask_b;
            for i in 0..dim {
                mat.swap(first * dim + i, second * dim + i);
            }
            for i in 0..dim {
                mat.swap(i * dim + first, i * dim + second);
            }
        }
    }
}

/// Re-express `mat`, given for target order `targets`, in ascending target
/// order `sorted`.
///
/// Walks `targets` towards `sorted`, swapping a pair of label bits per step;
/// at most k - 1 swaps. The input is not mutated.
pub fn sorted_operator(targets: &[usize], sorted: &[usize], mat: &[Complex64]) -> Vec<Complex64> {
    debug_assert_eq!(targets.len(), sorted.len());
    let dim = 1 << targets.len();
    debug_assert_eq!(mat.len(), dim * dim);

    let mut out = mat.to_vec();
    let mut current = TargetList::from_slice(targets);

    while current.as_slice() != sorted {
        let from = match current
            .iter()
            .zip(sorted.iter())
            .position(|(c, s)| c != s)
        {
            Some(pos) => pos,
            None => break,
        };
        // The qubit that belongs at `from` sits further right in `current`.
        let to = current
            .iter()
            .position(|&q| q == sorted[from])
            .expect("sorted list permutes the target list");

        swap_label_bits(from, to, &mut out, dim);
        current.swap(from, to);
    }

    out
}
