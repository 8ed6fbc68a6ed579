//! Material-interaction Hamiltonian.
//!
//! A 1-D nearest-neighbour chain:
//!
//! H = zz · Σᵢ ZᵢZᵢ₊₁ + xx · Σᵢ XᵢXᵢ₊₁ + z · Σᵢ Zᵢ
//!
//! Fiber ratio strengthens the ZZ alignment coupling, binding energy
//! strengthens the XX binding coupling, and a weak uniform field totalling
//! 0.2 is spread over all qubits.

use nanobrick_sim::{PauliHamiltonian, PauliTerm};
use serde::{Deserialize, Serialize};

use crate::error::{VqeError, VqeResult};

/// Coefficients of the three term families.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianCoefficients {
    pub zz: f64,
    pub xx: f64,
    pub z: f64,
}

impl HamiltonianCoefficients {
    /// Inputs are percentages in `[0, 100]` by convention but are not
    /// clamped.
    pub fn new(fiber_ratio: f64, binding_energy: f64, num_qubits: usize) -> Self {
        Self {
            zz: -1.0 - (fiber_ratio / 100.0) * 0.5,
            xx: -0.5 - (binding_energy / 100.0) * 0.3,
            z: 0.2 / num_qubits as f64,
        }
    }
}

/// Build the chain Hamiltonian.
///
/// Terms come out as all ZZ pairs, then all XX pairs, then all single Z,
/// each in ascending qubit order: `3n - 2` terms in total.
pub fn build_hamiltonian(
    fiber_ratio: f64,
    binding_energy: f64,
    num_qubits: usize,
) -> VqeResult<PauliHamiltonian> {
    if num_qubits < 2 {
        return Err(VqeError::InvalidQubitCount(num_qubits));
    }
    let c = HamiltonianCoefficients::new(fiber_ratio, binding_energy, num_qubits);

    let zz = (0..num_qubits - 1).map(|i| PauliTerm::zz(c.zz, i, i + 1));
    let xx = (0..num_qubits - 1).map(|i| PauliTerm::xx(c.xx, i, i + 1));
    let z = (0..num_qubits).map(|i| PauliTerm::z(c.z, i));

    Ok(zz.chain(xx).chain(z).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nanobrick_sim::Pauli;

    #[test]
    fn test_reference_coefficients() {
        let c = HamiltonianCoefficients::new(40.0, 50.0, 4);
        assert_relative_eq!(c.zz, -1.2, epsilon = 1e-12);
        assert_relative_eq!(c.xx, -0.65, epsilon = 1e-12);
        assert_relative_eq!(c.z, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_term_layout() {
        let h = build_hamiltonian(40.0, 50.0, 4).unwrap();
        assert_eq!(h.num_terms(), 10);
        assert_eq!(h.num_qubits(), 4);

        let labels: Vec<String> = h.terms().iter().map(|t| t.label(4)).collect();
        assert_eq!(
            labels,
            vec![
                "ZZII", "IZZI", "IIZZ", "XXII", "IXXI", "IIXX", "ZIII", "IZII", "IIZI", "IIIZ"
            ]
        );
        assert_relative_eq!(h.terms()[0].coefficient, -1.2, epsilon = 1e-12);
        assert_relative_eq!(h.terms()[3].coefficient, -0.65, epsilon = 1e-12);
        assert_relative_eq!(h.terms()[9].coefficient, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_two_qubit_boundary() {
        let h = build_hamiltonian(0.0, 0.0, 2).unwrap();
        assert_eq!(h.num_terms(), 4);
        assert_eq!(h.terms()[0].operators, vec![(0, Pauli::Z), (1, Pauli::Z)]);
        assert_eq!(h.terms()[1].operators, vec![(0, Pauli::X), (1, Pauli::X)]);
        assert_relative_eq!(h.terms()[0].coefficient, -1.0, epsilon = 1e-12);
        assert_relative_eq!(h.terms()[1].coefficient, -0.5, epsilon = 1e-12);
        assert_relative_eq!(h.terms()[2].coefficient, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_inputs_not_clamped() {
        let c = HamiltonianCoefficients::new(300.0, -100.0, 2);
        assert_relative_eq!(c.zz, -2.5, epsilon = 1e-12);
        assert_relative_eq!(c.xx, -0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_single_qubit() {
        assert!(matches!(
            build_hamiltonian(40.0, 50.0, 1),
            Err(VqeError::InvalidQubitCount(1))
        ));
    }
}
