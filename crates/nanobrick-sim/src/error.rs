//! Error types for the sim crate.

use thiserror::Error;

/// Errors raised while simulating a circuit or evaluating a Hamiltonian.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A rotation angle was never bound to a value.
    #[error("Gate '{gate}' on qubit {qubit} has unbound parameter '{parameter}'")]
    UnboundParameter {
        gate: &'static str,
        qubit: u32,
        parameter: String,
    },

    /// The simulator has no implementation for this gate.
    #[error("Gate '{0}' is not supported by the statevector simulator")]
    UnsupportedGate(String),

    /// A Pauli term references a qubit outside the circuit.
    #[error("Pauli term references qubit {qubit} but circuit only has {n_qubits} qubits")]
    QubitOutOfRange { qubit: usize, n_qubits: usize },

    /// The dense state would not fit in memory.
    #[error("Statevector simulation supports at most {max} qubits, got {got}")]
    TooManyQubits { got: usize, max: usize },

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] nanobrick_ir::IrError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
