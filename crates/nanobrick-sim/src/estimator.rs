//! Expectation-value evaluation.

use nanobrick_ir::Circuit;

use crate::error::{SimError, SimResult};
use crate::hamiltonian::PauliHamiltonian;
use crate::statevector::{MAX_QUBITS, Statevector};

/// Computes ⟨ψ|H|ψ⟩ where |ψ⟩ is the state `circuit` prepares from |0...0⟩.
///
/// Implementations must be deterministic for a given circuit and
/// Hamiltonian. Errors are returned to the caller unchanged.
pub trait ExpectationEvaluator {
    fn evaluate(&self, circuit: &Circuit, hamiltonian: &PauliHamiltonian) -> SimResult<f64>;
}

/// Exact evaluator backed by a dense [`Statevector`].
#[derive(Debug, Clone, Copy)]
pub struct StatevectorEstimator {
    max_qubits: usize,
}

impl StatevectorEstimator {
    pub fn new() -> Self {
        Self {
            max_qubits: MAX_QUBITS,
        }
    }

    /// Refuse circuits wider than `max_qubits`, capped at [`MAX_QUBITS`].
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits.min(MAX_QUBITS);
        self
    }
}

impl Default for StatevectorEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpectationEvaluator for StatevectorEstimator {
    fn evaluate(&self, circuit: &Circuit, hamiltonian: &PauliHamiltonian) -> SimResult<f64> {
        if circuit.num_qubits() > self.max_qubits {
            return Err(SimError::TooManyQubits {
                got: circuit.num_qubits(),
                max: self.max_qubits,
            });
        }
        if hamiltonian.num_qubits() > circuit.num_qubits() {
            return Err(SimError::QubitOutOfRange {
                qubit: hamiltonian.num_qubits() - 1,
                n_qubits: circuit.num_qubits(),
            });
        }

        let state = Statevector::from_circuit(circuit)?;
        let energy = state.expectation(hamiltonian)?;
        tracing::trace!(
            circuit = circuit.name(),
            gates = circuit.gate_count(),
            energy,
            "evaluated expectation value"
        );
        Ok(energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamiltonian::PauliTerm;
    use approx::assert_relative_eq;
    use nanobrick_ir::QubitId;

    #[test]
    fn test_zero_state_energy() {
        let circuit = Circuit::with_size("zero", 3);
        let h = PauliHamiltonian::new(vec![
            PauliTerm::zz(-1.0, 0, 1),
            PauliTerm::xx(-0.5, 1, 2),
            PauliTerm::z(0.2, 2),
        ]);
        let energy = StatevectorEstimator::new().evaluate(&circuit, &h).unwrap();
        assert_relative_eq!(energy, -1.0 + 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let mut circuit = Circuit::with_size("rot", 2);
        circuit.ry(0.3, QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.rz(-1.2, QubitId(1)).unwrap();
        let h = PauliHamiltonian::new(vec![PauliTerm::zz(-1.2, 0, 1), PauliTerm::xx(-0.65, 0, 1)]);

        let estimator = StatevectorEstimator::default();
        let a = estimator.evaluate(&circuit, &h).unwrap();
        let b = estimator.evaluate(&circuit, &h).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_hamiltonian_wider_than_circuit() {
        let circuit = Circuit::with_size("narrow", 2);
        let h = PauliHamiltonian::new(vec![PauliTerm::z(1.0, 3)]);
        let err = StatevectorEstimator::new().evaluate(&circuit, &h).unwrap_err();
        assert!(matches!(err, SimError::QubitOutOfRange { qubit: 3, .. }));
    }

    #[test]
    fn test_width_limit() {
        let circuit = Circuit::with_size("wide", 5);
        let h = PauliHamiltonian::default();
        let err = StatevectorEstimator::new()
            .with_max_qubits(4)
            .evaluate(&circuit, &h)
            .unwrap_err();
        assert!(matches!(err, SimError::TooManyQubits { got: 5, max: 4 }));
    }
}
