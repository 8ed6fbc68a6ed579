//! Error types for the variational optimizer.

use nanobrick_ir::IrError;
use nanobrick_sim::SimError;
use thiserror::Error;

/// Errors raised while building or optimizing an ansatz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VqeError {
    /// Parameter vector length does not match `5 × num_qubits`.
    #[error("Ansatz expects {expected} parameters, got {got}")]
    InvalidParameterCount { expected: usize, got: usize },

    /// The ansatz needs at least one entangling pair.
    #[error("At least 2 qubits are required, got {0}")]
    InvalidQubitCount(usize),

    /// Expectation-value evaluation failed.
    #[error(transparent)]
    Evaluator(#[from] SimError),

    /// Circuit construction failed.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] IrError),
}

/// Result type for variational optimization.
pub type VqeResult<T> = Result<T, VqeError>;
