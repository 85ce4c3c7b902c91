//! Dense state-vector quantum simulator core
//!
//! This crate holds the amplitudes of an N-qubit pure state in a 64-byte
//! aligned buffer of 2^N `Complex64` values and operates on them in place:
//! unitary gate application with automatic kernel dispatch, measurement
//! probabilities, expectation values, inverse-CDF outcome sampling, and
//! elementwise vector arithmetic.
//!
//! # Kernel dispatch
//!
//! [`StateVector::apply_matrix`] inspects the operator length: 2^k entries
//! select the diagonal path, 2^2k the dense path. Dense operators on two to
//! five targets can additionally take strided sorted-order kernels (enable
//! with [`SimulatorConfig::enable_optimized_gates`]) that reshape the
//! matrix once and then walk the register with branch-free stride loops.
//! All paths produce identical results.
//!
//! # Parallelism
//!
//! Kernels fork a single rayon region over their outermost iteration
//! domain when the configured thread budget exceeds one and the register
//! is larger than the configured threshold. The bit-index partition
//! guarantees each parallel chunk touches a disjoint slice of the buffer,
//! so there is no locking anywhere. Results are identical up to
//! floating-point associativity.
//!
//! # Example
//!
//! ```
//! use qvec_state::StateVector;
//!
//! let mut state = StateVector::new(3).unwrap();
//! state.initialize_plus();
//!
//! let probs = state.probabilities();
//! assert_eq!(probs.len(), 8);
//! assert!((probs[0] - 0.125).abs() < 1e-12);
//! ```

mod buffer;
pub mod config;
pub mod error;
pub mod kernels;
mod reductions;
mod sampling;
mod serialization;
pub mod state_vector;

pub use config::SimulatorConfig;
pub use error::{Result, StateError};
pub use state_vector::{StateVector, MAX_QUBITS};
