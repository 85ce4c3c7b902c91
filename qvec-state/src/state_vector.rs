//! Dense quantum state vector
//!
//! [`StateVector`] owns a 64-byte aligned buffer of 2^N complex amplitudes
//! and exposes the full simulator surface: gate application with automatic
//! kernel dispatch, reductions, measurement sampling, and in-place vector
//! arithmetic. Index bit q holds the basis value of qubit q.

use num_complex::Complex64;
use rayon::prelude::*;

use qvec_core::operator::{sorted_operator, sorted_targets};

use crate::buffer::AlignedBuffer;
use crate::config::SimulatorConfig;
use crate::error::{Result, StateError};
use crate::kernels::{multi_qubit, single_qubit, two_qubit};
use crate::{reductions, sampling};

/// Largest register this build will allocate; 2^30 amplitudes is 16 GiB.
pub const MAX_QUBITS: usize = 30;

/// Dense N-qubit state vector with per-instance execution configuration
///
/// A fresh instance holds all-zero amplitudes; call [`initialize`] for the
/// canonical |0...0> state. The physical normalization constraint is never
/// enforced, so sub-normalized intermediate states are fine;
/// [`renormalize`] restores unit norm on demand.
///
/// [`initialize`]: StateVector::initialize
/// [`renormalize`]: StateVector::renormalize
///
/// # Example
///
/// ```
/// use num_complex::Complex64;
/// use qvec_state::StateVector;
///
/// // Prepare the Bell state (|00> + |11>)/sqrt(2).
/// let mut state = StateVector::new(2).unwrap();
/// state.initialize();
///
/// let h = std::f64::consts::FRAC_1_SQRT_2;
/// let hadamard = [
///     Complex64::new(h, 0.0),
///     Complex64::new(h, 0.0),
///     Complex64::new(h, 0.0),
///     Complex64::new(-h, 0.0),
/// ];
/// state.apply_matrix(&[0], &hadamard).unwrap();
/// state.apply_cnot(0, 1).unwrap();
///
/// let probs = state.probabilities();
/// assert!((probs[0] - 0.5).abs() < 1e-12);
/// assert!((probs[3] - 0.5).abs() < 1e-12);
/// ```
#[derive(Clone)]
pub struct StateVector {
    buffer: AlignedBuffer,
    num_qubits: usize,
    config: SimulatorConfig,
}

impl StateVector {
    /// Create a state of `num_qubits` qubits with all 2^N amplitudes zero.
    pub fn new(num_qubits: usize) -> Result<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(StateError::TooManyQubits {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        Ok(Self {
            buffer: AlignedBuffer::zeroed(1 << num_qubits)?,
            num_qubits,
            config: SimulatorConfig::default(),
        })
    }

    /// Create a state from a complex amplitude vector whose length must be
    /// a power of two; the qubit count is inferred.
    pub fn from_amplitudes(amplitudes: &[Complex64]) -> Result<Self> {
        if !amplitudes.len().is_power_of_two() {
            return Err(StateError::NotPowerOfTwo {
                len: amplitudes.len(),
            });
        }
        Ok(Self {
            buffer: AlignedBuffer::from_slice(amplitudes)?,
            num_qubits: amplitudes.len().trailing_zeros() as usize,
            config: SimulatorConfig::default(),
        })
    }

    /// Create a state from real amplitudes; same length rule as
    /// [`from_amplitudes`](Self::from_amplitudes).
    pub fn from_real_amplitudes(amplitudes: &[f64]) -> Result<Self> {
        if !amplitudes.len().is_power_of_two() {
            return Err(StateError::NotPowerOfTwo {
                len: amplitudes.len(),
            });
        }
        let complex: Vec<Complex64> = amplitudes
            .iter()
            .map(|&re| Complex64::new(re, 0.0))
            .collect();
        Self::from_amplitudes(&complex)
    }

    /// Replace the whole amplitude vector, re-inferring the qubit count.
    /// The execution configuration is kept.
    pub fn assign(&mut self, amplitudes: &[Complex64]) -> Result<()> {
        if !amplitudes.len().is_power_of_two() {
            return Err(StateError::NotPowerOfTwo {
                len: amplitudes.len(),
            });
        }
        self.buffer = AlignedBuffer::from_slice(amplitudes)?;
        self.num_qubits = amplitudes.len().trailing_zeros() as usize;
        Ok(())
    }

    /// Number of qubits N
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// State dimension 2^N
    #[inline]
    pub fn dimension(&self) -> usize {
        self.buffer.len()
    }

    /// Borrow the amplitudes in canonical index order
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        self.buffer.as_slice()
    }

    /// Mutably borrow the amplitudes
    #[inline]
    pub fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        self.buffer.as_mut_slice()
    }

    /// Read one amplitude with bounds checking
    pub fn amplitude(&self, index: usize) -> Result<Complex64> {
        self.check_index(index)?;
        Ok(self.buffer.as_slice()[index])
    }

    /// Write one amplitude with bounds checking
    pub fn set_amplitude(&mut self, index: usize, value: Complex64) -> Result<()> {
        self.check_index(index)?;
        self.buffer.as_mut_slice()[index] = value;
        Ok(())
    }

    /// Execution configuration
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Mutable execution configuration
    pub fn config_mut(&mut self) -> &mut SimulatorConfig {
        &mut self.config
    }

    /// Set thread budget, parallelization threshold and the fast-path
    /// toggle in one call.
    pub fn configure(&mut self, threads: usize, parallel_threshold: usize, optimized_gates: bool) {
        self.config.set_threads(threads);
        self.config.set_parallel_threshold(parallel_threshold);
        if optimized_gates {
            self.config.enable_optimized_gates();
        } else {
            self.config.disable_optimized_gates();
        }
    }

    /// Reset to the computational basis state |0...0>.
    pub fn initialize(&mut self) {
        let state = self.buffer.as_mut_slice();
        for amp in state.iter_mut() {
            *amp = Complex64::new(0.0, 0.0);
        }
        state[0] = Complex64::new(1.0, 0.0);
    }

    /// Reset to the uniform superposition |+...+> with every amplitude
    /// 2^(-N/2).
    pub fn initialize_plus(&mut self) {
        let value = Complex64::new(1.0 / (self.dimension() as f64).sqrt(), 0.0);
        for amp in self.buffer.as_mut_slice() {
            *amp = value;
        }
    }

    /// Multiply every amplitude by a scalar in place.
    pub fn scale<F: Into<Complex64>>(&mut self, factor: F) {
        let factor = factor.into();
        let parallel = self.parallel();
        let state = self.buffer.as_mut_slice();
        if parallel {
            state.par_iter_mut().for_each(|amp| *amp *= factor);
        } else {
            for amp in state.iter_mut() {
                *amp *= factor;
            }
        }
    }

    /// Elementwise in-place addition of another state of the same size.
    pub fn add(&mut self, other: &StateVector) -> Result<()> {
        self.check_same_dimension(other)?;
        let parallel = self.parallel();
        let state = self.buffer.as_mut_slice();
        let rhs = other.buffer.as_slice();
        if parallel {
            state
                .par_iter_mut()
                .zip(rhs.par_iter())
                .for_each(|(amp, r)| *amp += r);
        } else {
            for (amp, r) in state.iter_mut().zip(rhs.iter()) {
                *amp += r;
            }
        }
        Ok(())
    }

    /// Elementwise in-place subtraction of another state of the same size.
    pub fn sub(&mut self, other: &StateVector) -> Result<()> {
        self.check_same_dimension(other)?;
        let parallel = self.parallel();
        let state = self.buffer.as_mut_slice();
        let rhs = other.buffer.as_slice();
        if parallel {
            state
                .par_iter_mut()
                .zip(rhs.par_iter())
                .for_each(|(amp, r)| *amp -= r);
        } else {
            for (amp, r) in state.iter_mut().zip(rhs.iter()) {
                *amp -= r;
            }
        }
        Ok(())
    }

    /// Conjugate every amplitude in place.
    pub fn conj(&mut self) {
        let parallel = self.parallel();
        let state = self.buffer.as_mut_slice();
        if parallel {
            state.par_iter_mut().for_each(|amp| *amp = amp.conj());
        } else {
            for amp in state.iter_mut() {
                *amp = amp.conj();
            }
        }
    }

    /// Rescale to unit norm. A zero-norm state is left unchanged.
    pub fn renormalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            self.scale(1.0 / norm.sqrt());
        }
    }

    /// Squared norm of the state, the sum of all |amplitude|^2.
    pub fn norm(&self) -> f64 {
        reductions::norm(self.buffer.as_slice(), self.parallel())
    }

    /// Dot product without conjugation, sum of A_i * B_i.
    pub fn dot(&self, other: &StateVector) -> Result<Complex64> {
        self.check_same_dimension(other)?;
        Ok(reductions::dot(
            self.buffer.as_slice(),
            other.buffer.as_slice(),
            self.parallel(),
        ))
    }

    /// Inner product <self|other> with the right-hand side conjugated.
    pub fn inner_product(&self, other: &StateVector) -> Result<Complex64> {
        self.check_same_dimension(other)?;
        Ok(reductions::inner_product(
            self.buffer.as_slice(),
            other.buffer.as_slice(),
            self.parallel(),
        ))
    }

    /// Apply a k-qubit operator to the given targets in place.
    ///
    /// `mat` is either the 2^k diagonal entries or the full 2^k x 2^k
    /// matrix in column-major layout, labelled in the order the targets are
    /// listed. Dense operators on two to five targets take the strided
    /// sorted-order kernels when the fast-path toggle is on, the generic
    /// gather/scatter path otherwise; six targets and up use the
    /// runtime-arity path.
    pub fn apply_matrix(&mut self, targets: &[usize], mat: &[Complex64]) -> Result<()> {
        self.check_targets(targets)?;
        let k = targets.len();
        let dim = 1usize << k;
        let parallel = self.parallel();

        if k == 0 {
            // A zero-target operator is a scalar.
            return if mat.len() == 1 {
                self.scale(mat[0]);
                Ok(())
            } else {
                Err(StateError::InvalidOperatorLength {
                    len: mat.len(),
                    targets: 0,
                })
            };
        }

        if mat.len() == dim {
            if k == 1 {
                single_qubit::apply_diagonal(self.buffer.as_mut_slice(), targets[0], mat, parallel);
            } else {
                let sorted = sorted_targets(targets);
                multi_qubit::apply_diagonal(
                    self.buffer.as_mut_slice(),
                    targets,
                    &sorted,
                    mat,
                    parallel,
                );
            }
            Ok(())
        } else if mat.len() == dim * dim {
            if k == 1 {
                single_qubit::apply_dense(self.buffer.as_mut_slice(), targets[0], mat, parallel);
                return Ok(());
            }
            let sorted = sorted_targets(targets);
            let state = self.buffer.as_mut_slice();
            if (2..=5).contains(&k) && self.config.optimized_gates() {
                let sorted_mat = sorted_operator(targets, &sorted, mat);
                match k {
                    2 => multi_qubit::apply_dense2_sorted(state, &sorted, &sorted_mat, parallel),
                    3 => multi_qubit::apply_dense3_sorted(state, &sorted, &sorted_mat, parallel),
                    4 => multi_qubit::apply_dense4_sorted(state, &sorted, &sorted_mat, parallel),
                    _ => multi_qubit::apply_dense5_sorted(state, &sorted, &sorted_mat, parallel),
                }
            } else {
                match k {
                    2 => multi_qubit::apply_dense_static::<4>(state, targets, &sorted, mat, parallel),
                    3 => multi_qubit::apply_dense_static::<8>(state, targets, &sorted, mat, parallel),
                    4 => {
                        multi_qubit::apply_dense_static::<16>(state, targets, &sorted, mat, parallel)
                    }
                    5 => {
                        multi_qubit::apply_dense_static::<32>(state, targets, &sorted, mat, parallel)
                    }
                    _ => multi_qubit::apply_dense_dynamic(state, targets, &sorted, mat, parallel),
                }
            }
            Ok(())
        } else {
            Err(StateError::InvalidOperatorLength {
                len: mat.len(),
                targets: k,
            })
        }
    }

    /// Pauli-X on one qubit.
    pub fn apply_x(&mut self, qubit: usize) -> Result<()> {
        self.check_qubit(qubit)?;
        let parallel = self.parallel();
        single_qubit::apply_x(self.buffer.as_mut_slice(), qubit, parallel);
        Ok(())
    }

    /// Pauli-Y on one qubit.
    pub fn apply_y(&mut self, qubit: usize) -> Result<()> {
        self.check_qubit(qubit)?;
        let parallel = self.parallel();
        single_qubit::apply_y(self.buffer.as_mut_slice(), qubit, parallel);
        Ok(())
    }

    /// Pauli-Z on one qubit.
    pub fn apply_z(&mut self, qubit: usize) -> Result<()> {
        self.check_qubit(qubit)?;
        let parallel = self.parallel();
        single_qubit::apply_z(self.buffer.as_mut_slice(), qubit, parallel);
        Ok(())
    }

    /// Controlled-NOT with the given control and target qubits.
    pub fn apply_cnot(&mut self, control: usize, target: usize) -> Result<()> {
        self.check_qubit(control)?;
        self.check_qubit(target)?;
        if control == target {
            return Err(StateError::DuplicateTarget { qubit: control });
        }
        let parallel = self.parallel();
        two_qubit::apply_cnot(self.buffer.as_mut_slice(), control, target, parallel);
        Ok(())
    }

    /// Controlled-Z; symmetric in its arguments.
    pub fn apply_cz(&mut self, qubit_a: usize, qubit_b: usize) -> Result<()> {
        self.check_qubit(qubit_a)?;
        self.check_qubit(qubit_b)?;
        if qubit_a == qubit_b {
            return Err(StateError::DuplicateTarget { qubit: qubit_a });
        }
        let parallel = self.parallel();
        two_qubit::apply_cz(self.buffer.as_mut_slice(), qubit_a, qubit_b, parallel);
        Ok(())
    }

    /// SWAP the two given qubits.
    pub fn apply_swap(&mut self, qubit_a: usize, qubit_b: usize) -> Result<()> {
        self.check_qubit(qubit_a)?;
        self.check_qubit(qubit_b)?;
        if qubit_a == qubit_b {
            return Err(StateError::DuplicateTarget { qubit: qubit_a });
        }
        let parallel = self.parallel();
        two_qubit::apply_swap(self.buffer.as_mut_slice(), qubit_a, qubit_b, parallel);
        Ok(())
    }

    /// Probability of the full-register outcome `index`.
    pub fn probability(&self, index: usize) -> Result<f64> {
        self.check_index(index)?;
        Ok(self.buffer.as_slice()[index].norm_sqr())
    }

    /// Marginal probability that measuring `targets` yields `outcome`,
    /// outcome bits read in the listed target order.
    pub fn probability_of(&self, targets: &[usize], outcome: usize) -> Result<f64> {
        self.check_targets(targets)?;
        if targets.is_empty() {
            return Ok(self.norm());
        }
        let dim = 1usize << targets.len();
        if outcome >= dim {
            return Err(StateError::IndexOutOfBounds {
                index: outcome,
                dimension: dim,
            });
        }
        let sorted = sorted_targets(targets);
        Ok(reductions::marginal_probability(
            self.buffer.as_slice(),
            targets,
            &sorted,
            outcome,
            self.parallel(),
        ))
    }

    /// Probabilities of all 2^N outcomes, the elementwise |amplitude|^2.
    pub fn probabilities(&self) -> Vec<f64> {
        reductions::all_probabilities(self.buffer.as_slice(), self.parallel())
    }

    /// Measurement outcome distribution on a target subset.
    pub fn probabilities_for(&self, targets: &[usize]) -> Result<Vec<f64>> {
        self.check_targets(targets)?;
        if targets.is_empty() {
            return Ok(vec![self.norm()]);
        }
        let sorted = sorted_targets(targets);
        if targets.len() == self.num_qubits && targets == sorted.as_slice() {
            return Ok(self.probabilities());
        }
        Ok(reductions::target_probabilities(
            self.buffer.as_slice(),
            targets,
            &sorted,
            self.parallel(),
        ))
    }

    /// Expectation value <psi|U|psi> of a dense or diagonal operator.
    pub fn expectation_value(&self, targets: &[usize], mat: &[Complex64]) -> Result<Complex64> {
        self.check_targets(targets)?;
        let k = targets.len();
        let dim = 1usize << k;

        if k == 0 {
            return if mat.len() == 1 {
                Ok(mat[0] * self.norm())
            } else {
                Err(StateError::InvalidOperatorLength {
                    len: mat.len(),
                    targets: 0,
                })
            };
        }

        let sorted = sorted_targets(targets);
        let parallel = self.parallel();
        if mat.len() == dim {
            Ok(reductions::expectation_diagonal(
                self.buffer.as_slice(),
                targets,
                &sorted,
                mat,
                parallel,
            ))
        } else if mat.len() == dim * dim {
            Ok(reductions::expectation_dense(
                self.buffer.as_slice(),
                targets,
                &sorted,
                mat,
                parallel,
            ))
        } else {
            Err(StateError::InvalidOperatorLength {
                len: mat.len(),
                targets: k,
            })
        }
    }

    /// Squared norm the state would have after applying the operator,
    /// without modifying the state.
    pub fn norm_applied(&self, targets: &[usize], mat: &[Complex64]) -> Result<f64> {
        self.check_targets(targets)?;
        let k = targets.len();
        let dim = 1usize << k;

        if k == 0 {
            return if mat.len() == 1 {
                Ok(mat[0].norm_sqr() * self.norm())
            } else {
                Err(StateError::InvalidOperatorLength {
                    len: mat.len(),
                    targets: 0,
                })
            };
        }

        let sorted = sorted_targets(targets);
        let parallel = self.parallel();
        if mat.len() == dim {
            Ok(reductions::norm_applied_diagonal(
                self.buffer.as_slice(),
                targets,
                &sorted,
                mat,
                parallel,
            ))
        } else if mat.len() == dim * dim {
            Ok(reductions::norm_applied_dense(
                self.buffer.as_slice(),
                targets,
                &sorted,
                mat,
                parallel,
            ))
        } else {
            Err(StateError::InvalidOperatorLength {
                len: mat.len(),
                targets: k,
            })
        }
    }

    /// Draw one measurement outcome per supplied random value in [0, 1).
    ///
    /// Output position s corresponds to `rnds[s]` whatever the thread
    /// budget. The walk assumes a normalized state.
    pub fn sample_measure(&self, rnds: &[f64]) -> Vec<usize> {
        sampling::sample_measure(
            self.buffer.as_slice(),
            rnds,
            self.config.parallel_sampling(),
        )
    }

    #[inline]
    fn parallel(&self) -> bool {
        self.config.should_parallelize(self.num_qubits)
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(StateError::QubitOutOfBounds {
                qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.dimension() {
            return Err(StateError::IndexOutOfBounds {
                index,
                dimension: self.dimension(),
            });
        }
        Ok(())
    }

    fn check_targets(&self, targets: &[usize]) -> Result<()> {
        for (i, &qubit) in targets.iter().enumerate() {
            self.check_qubit(qubit)?;
            if targets[..i].contains(&qubit) {
                return Err(StateError::DuplicateTarget { qubit });
            }
        }
        Ok(())
    }

    fn check_same_dimension(&self, other: &StateVector) -> Result<()> {
        if self.dimension() != other.dimension() {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for StateVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateVector")
            .field("num_qubits", &self.num_qubits)
            .field("dimension", &self.dimension())
            .field("norm", &self.norm())
            .finish()
    }
}
