//! Index and operator-layout primitives for dense state-vector simulation
//!
//! An N-qubit state vector stores one complex amplitude per computational
//! basis state, with bit q of the amplitude index holding the basis value of
//! qubit q (little-endian qubit ordering). Applying a k-qubit operator means
//! visiting, for every configuration of the N-k untouched qubits, the 2^k
//! amplitudes obtained by varying the target bits.
//!
//! This crate provides the two pure building blocks for that traversal:
//!
//! - [`indexing`]: expands an outer counter over the untouched qubits into
//!   the full-register indices of the 2^k amplitudes a kernel touches.
//! - [`operator`]: re-expresses a column-major operator given for an
//!   arbitrary target order in ascending target order, which the strided
//!   fast-path kernels require.
//!
//! Both modules are deterministic and allocation-light; the compile-time
//! arity variants keep the whole index tuple on the stack.

pub mod indexing;
pub mod operator;
