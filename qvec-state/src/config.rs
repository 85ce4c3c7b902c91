//! Simulator configuration
//!
//! Three knobs that affect performance only, never results: the thread
//! budget, the register size above which kernels go parallel, and the
//! strided fast-path toggle for two- to five-target dense operators.

/// Per-instance execution configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Thread budget for kernel execution
    threads: usize,

    /// Register size (in qubits) a state must exceed before kernels
    /// parallelize
    parallel_threshold: usize,

    /// Use the strided sorted-target kernels for 2..=5 target dense
    /// operators
    optimized_gates: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            parallel_threshold: 16,
            optimized_gates: false,
        }
    }
}

impl SimulatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current thread budget
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Set the thread budget; values below one are ignored
    pub fn set_threads(&mut self, threads: usize) {
        if threads > 0 {
            self.threads = threads;
        }
    }

    /// Current parallelization threshold in qubits
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Set the parallelization threshold; values below one are ignored
    pub fn set_parallel_threshold(&mut self, qubits: usize) {
        if qubits > 0 {
            self.parallel_threshold = qubits;
        }
    }

    /// Whether the strided fast-path kernels are enabled
    pub fn optimized_gates(&self) -> bool {
        self.optimized_gates
    }

    pub fn enable_optimized_gates(&mut self) {
        self.optimized_gates = true;
    }

    pub fn disable_optimized_gates(&mut self) {
        self.optimized_gates = false;
    }

    /// Whether a kernel over a register of `num_qubits` should parallelize
    pub(crate) fn should_parallelize(&self, num_qubits: usize) -> bool {
        self.threads > 1 && num_qubits > self.parallel_threshold
    }

    /// Sampling parallelizes over shots, so only the thread budget gates it
    pub(crate) fn parallel_sampling(&self) -> bool {
        self.threads > 1
    }
}
