//! Measurement sampling
//!
//! Inverse-CDF sampling over the squared amplitudes. Each draw walks the
//! probability prefix sum until it passes the caller-supplied random value;
//! the walk assumes the state is close to normalized, which is the caller's
//! responsibility. Shots are independent, so the parallel path maps over
//! shots and is gated on the thread budget alone.

use num_complex::Complex64;
use rayon::prelude::*;

/// Draw one basis-state index per random value in `rnds`.
///
/// Output position s always corresponds to `rnds[s]` regardless of
/// parallelization order. The last basis state is the fallback when
/// accumulated probability never passes the draw.
pub(crate) fn sample_measure(state: &[Complex64], rnds: &[f64], parallel: bool) -> Vec<usize> {
    if parallel {
        rnds.par_iter().map(|&rnd| draw(state, rnd)).collect()
    } else {
        rnds.iter().map(|&rnd| draw(state, rnd)).collect()
    }
}

#[inline]
fn draw(state: &[Complex64], rnd: f64) -> usize {
    let mut p = 0.0;
    for (sample, amp) in state[..state.len() - 1].iter().enumerate() {
        p += amp.norm_sqr();
        if rnd < p {
            return sample;
        }
    }
    state.len() - 1
}
