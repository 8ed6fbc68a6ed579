//! Layered RY-RZ ansatz with alternating CNOT ladders.
//!
//! For `n` qubits the circuit consumes `5n` angles in order:
//!
//! 1. `RY(θ[2i])`, `RZ(θ[2i+1])` on every qubit `i`
//! 2. `CX(i → i+1)` for `i` in `0..n-1`
//! 3. `RY`, `RZ` on every qubit, next `2n` angles
//! 4. `CX(i+1 → i)` for `i` in `0..n-1` (reversed direction)
//! 5. `RY` on every qubit, last `n` angles
//!
//! The structure, and therefore depth and gate count, is independent of the
//! angle values.

use nanobrick_ir::{Circuit, QubitId};

use crate::error::{VqeError, VqeResult};

/// Angles consumed per qubit: two rotation layers of RY+RZ plus a final RY.
pub const PARAMS_PER_QUBIT: usize = 5;

/// Number of angles [`build_ansatz`] expects for `num_qubits` qubits.
pub fn num_parameters(num_qubits: usize) -> usize {
    PARAMS_PER_QUBIT * num_qubits
}

/// A bound ansatz circuit.
#[derive(Debug, Clone)]
pub struct Ansatz {
    circuit: Circuit,
}

impl Ansatz {
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }

    /// Longest chain of sequential operations on any qubit.
    pub fn depth(&self) -> usize {
        self.circuit.depth()
    }

    /// Total number of gates, `5n + 2(n-1)`.
    pub fn gate_count(&self) -> usize {
        self.circuit.gate_count()
    }
}

/// Build the ansatz for `params` over `num_qubits` qubits.
#[allow(clippy::cast_possible_truncation)]
pub fn build_ansatz(params: &[f64], num_qubits: usize) -> VqeResult<Ansatz> {
    if num_qubits < 2 {
        return Err(VqeError::InvalidQubitCount(num_qubits));
    }
    let expected = num_parameters(num_qubits);
    if params.len() != expected {
        return Err(VqeError::InvalidParameterCount {
            expected,
            got: params.len(),
        });
    }

    let mut circuit = Circuit::with_size("nanobrick_ansatz", num_qubits as u32);
    let qubit = |i: usize| QubitId(i as u32);
    let mut angles = params.iter().copied();
    let mut next = || angles.next().unwrap_or_default();

    for i in 0..num_qubits {
        circuit.ry(next(), qubit(i))?;
        circuit.rz(next(), qubit(i))?;
    }
    for i in 0..num_qubits - 1 {
        circuit.cx(qubit(i), qubit(i + 1))?;
    }

    for i in 0..num_qubits {
        circuit.ry(next(), qubit(i))?;
        circuit.rz(next(), qubit(i))?;
    }
    for i in 0..num_qubits - 1 {
        circuit.cx(qubit(i + 1), qubit(i))?;
    }

    for i in 0..num_qubits {
        circuit.ry(next(), qubit(i))?;
    }

    Ok(Ansatz { circuit })
}
