//! Error types for state vector operations

use thiserror::Error;

/// Errors that can occur during state vector operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Qubit index at or beyond the register size
    #[error("qubit index {qubit} out of bounds for {num_qubits}-qubit state")]
    QubitOutOfBounds { qubit: usize, num_qubits: usize },

    /// Amplitude or outcome index at or beyond the state dimension
    #[error("index {index} out of bounds for dimension {dimension}")]
    IndexOutOfBounds { index: usize, dimension: usize },

    /// The same qubit named twice in a target list
    #[error("qubit {qubit} appears more than once in the target list")]
    DuplicateTarget { qubit: usize },

    /// Two states combined with different dimensions
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Operator length is neither 2^k (diagonal) nor 2^2k (dense) for k targets
    #[error("operator of length {len} fits neither the diagonal nor the dense form for {targets} target(s)")]
    InvalidOperatorLength { len: usize, targets: usize },

    /// Incoming amplitude vector length is not a power of two
    #[error("amplitude vector of length {len} is not a power of two")]
    NotPowerOfTwo { len: usize },

    /// Register too large for this build
    #[error("{num_qubits} qubits exceed the supported maximum of {max}")]
    TooManyQubits { num_qubits: usize, max: usize },

    /// Memory allocation error
    #[error("failed to allocate {size} bytes for the amplitude buffer")]
    AllocationFailed { size: usize },
}

/// Result type for state vector operations
pub type Result<T> = std::result::Result<T, StateError>;
