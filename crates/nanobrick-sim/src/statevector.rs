//! Dense statevector simulation.
//!
//! Basis index bit `q` holds the value of qubit `q`.

use num_complex::Complex64;

use nanobrick_ir::{Circuit, Instruction, StandardGate};

use crate::error::{SimError, SimResult};
use crate::hamiltonian::{Pauli, PauliHamiltonian, PauliTerm};

/// Largest register the simulator will allocate (2^24 amplitudes, 256 MiB).
pub const MAX_QUBITS: usize = 24;

/// A pure state over `num_qubits` qubits.
#[derive(Debug, Clone)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> SimResult<Self> {
        if num_qubits > MAX_QUBITS {
            return Err(SimError::TooManyQubits {
                got: num_qubits,
                max: MAX_QUBITS,
            });
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Prepare the state produced by `circuit` acting on |0...0⟩.
    pub fn from_circuit(circuit: &Circuit) -> SimResult<Self> {
        let mut state = Self::new(circuit.num_qubits())?;
        for instruction in circuit.instructions() {
            state.apply(instruction)?;
        }
        Ok(state)
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// ⟨ψ|ψ⟩. Stays at 1 up to rounding since every gate is unitary.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Apply an instruction to the statevector.
    pub fn apply(&mut self, instruction: &Instruction) -> SimResult<()> {
        let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
        if let Some(&q) = qubits.iter().find(|&&q| q >= self.num_qubits) {
            return Err(SimError::QubitOutOfRange {
                qubit: q,
                n_qubits: self.num_qubits,
            });
        }

        let gate = &instruction.gate;
        let angle = || -> SimResult<f64> {
            let param = gate
                .parameter()
                .ok_or_else(|| SimError::UnsupportedGate(gate.name().to_string()))?;
            param.as_f64().ok_or_else(|| SimError::UnboundParameter {
                gate: gate.name(),
                qubit: instruction.qubits[0].0,
                parameter: param.to_string(),
            })
        };

        match gate {
            StandardGate::I => {}
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::Z => self.apply_z(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::Rx(_) => self.apply_rx(qubits[0], angle()?),
            StandardGate::Ry(_) => self.apply_ry(qubits[0], angle()?),
            StandardGate::Rz(_) => self.apply_rz(qubits[0], angle()?),
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::CZ => self.apply_cz(qubits[0], qubits[1]),
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = std::f64::consts::FRAC_1_SQRT_2;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = sqrt2_inv * (a + b);
                self.amplitudes[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let both = (1 << control) | (1 << target);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & both == both {
                *amp = -*amp;
            }
        }
    }

    // =========================================================================
    // Expectation values
    // =========================================================================

    /// Re⟨ψ|P|ψ⟩ for a single Pauli string, ignoring its coefficient.
    ///
    /// P maps |i⟩ to phase(i)·|i ⊕ flip⟩, so the overlap is a single pass
    /// over the amplitudes with no scratch state.
    pub fn pauli_expectation(&self, term: &PauliTerm) -> SimResult<f64> {
        let mut flip = 0usize;
        for &(q, pauli) in &term.operators {
            if q >= self.num_qubits {
                return Err(SimError::QubitOutOfRange {
                    qubit: q,
                    n_qubits: self.num_qubits,
                });
            }
            if matches!(pauli, Pauli::X | Pauli::Y) {
                flip |= 1 << q;
            }
        }

        let mut total = Complex64::new(0.0, 0.0);
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if amp.norm_sqr() == 0.0 {
                continue;
            }
            let mut phase = Complex64::new(1.0, 0.0);
            for &(q, pauli) in &term.operators {
                let bit_set = i & (1 << q) != 0;
                match pauli {
                    Pauli::I | Pauli::X => {}
                    Pauli::Y => {
                        phase *= if bit_set {
                            Complex64::new(0.0, -1.0)
                        } else {
                            Complex64::new(0.0, 1.0)
                        };
                    }
                    Pauli::Z => {
                        if bit_set {
                            phase = -phase;
                        }
                    }
                }
            }
            total += self.amplitudes[i ^ flip].conj() * phase * *amp;
        }
        Ok(total.re)
    }

    /// Σ cᵢ Re⟨ψ|Pᵢ|ψ⟩.
    pub fn expectation(&self, hamiltonian: &PauliHamiltonian) -> SimResult<f64> {
        hamiltonian.terms().iter().try_fold(0.0, |acc, term| {
            Ok(acc + term.coefficient * self.pauli_expectation(term)?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nanobrick_ir::{ParameterExpression, QubitId};
    use std::f64::consts::PI;

    fn state_of(circuit: &Circuit) -> Statevector {
        Statevector::from_circuit(circuit).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(3).unwrap();
        assert_eq!(sv.amplitudes().len(), 8);
        assert_relative_eq!(sv.amplitudes()[0].re, 1.0);
        assert_relative_eq!(sv.norm_sqr(), 1.0);
    }

    #[test]
    fn test_too_many_qubits() {
        let err = Statevector::new(MAX_QUBITS + 1).unwrap_err();
        assert!(matches!(err, SimError::TooManyQubits { .. }));
    }

    #[test]
    fn test_z_on_zero_state() {
        let sv = Statevector::new(1).unwrap();
        assert_relative_eq!(sv.pauli_expectation(&PauliTerm::z(1.0, 0)).unwrap(), 1.0);
        assert_relative_eq!(sv.pauli_expectation(&PauliTerm::x(1.0, 0)).unwrap(), 0.0);
    }

    #[test]
    fn test_x_flips_little_endian_bit() {
        let mut circuit = Circuit::with_size("flip", 2);
        circuit.x(QubitId(1)).unwrap();
        let sv = state_of(&circuit);

        // |q1 q0⟩ = |10⟩ -> basis index 2
        assert_relative_eq!(sv.amplitudes()[2].re, 1.0);
        assert_relative_eq!(sv.pauli_expectation(&PauliTerm::z(1.0, 0)).unwrap(), 1.0);
        assert_relative_eq!(sv.pauli_expectation(&PauliTerm::z(1.0, 1)).unwrap(), -1.0);
    }

    #[test]
    fn test_ry_rotation_expectations() {
        let theta = 0.7;
        let mut circuit = Circuit::with_size("ry", 1);
        circuit.ry(theta, QubitId(0)).unwrap();
        let sv = state_of(&circuit);

        assert_relative_eq!(
            sv.pauli_expectation(&PauliTerm::z(1.0, 0)).unwrap(),
            theta.cos(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            sv.pauli_expectation(&PauliTerm::x(1.0, 0)).unwrap(),
            theta.sin(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_y_expectation_after_rx() {
        // RX(θ)|0⟩ has ⟨Y⟩ = -sin θ
        let theta = 1.1;
        let mut circuit = Circuit::with_size("rx", 1);
        circuit.rx(theta, QubitId(0)).unwrap();
        let sv = state_of(&circuit);
        assert_relative_eq!(
            sv.pauli_expectation(&PauliTerm::y(1.0, 0)).unwrap(),
            -theta.sin(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_bell_state_correlations() {
        let mut circuit = Circuit::with_size("bell", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let sv = state_of(&circuit);

        assert_relative_eq!(
            sv.pauli_expectation(&PauliTerm::zz(1.0, 0, 1)).unwrap(),
            1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            sv.pauli_expectation(&PauliTerm::xx(1.0, 0, 1)).unwrap(),
            1.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            sv.pauli_expectation(&PauliTerm::z(1.0, 0)).unwrap(),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_cz_phase() {
        let mut circuit = Circuit::with_size("cz", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.x(QubitId(1)).unwrap();
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        let sv = state_of(&circuit);
        // CZ with qubit 1 set acts as Z on qubit 0: |+⟩ -> |-⟩
        assert_relative_eq!(
            sv.pauli_expectation(&PauliTerm::x(1.0, 0)).unwrap(),
            -1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rz_preserves_populations() {
        let mut circuit = Circuit::with_size("rz", 1);
        circuit.h(QubitId(0)).unwrap();
        circuit.rz(PI / 2.0, QubitId(0)).unwrap();
        let sv = state_of(&circuit);
        assert_relative_eq!(sv.norm_sqr(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            sv.pauli_expectation(&PauliTerm::y(1.0, 0)).unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_weighted_sum() {
        let sv = Statevector::new(2).unwrap();
        let h = PauliHamiltonian::new(vec![
            PauliTerm::zz(-1.2, 0, 1),
            PauliTerm::z(0.05, 0),
            PauliTerm::z(0.05, 1),
            PauliTerm::identity(0.3),
        ]);
        assert_relative_eq!(sv.expectation(&h).unwrap(), -1.2 + 0.1 + 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_unbound_parameter_is_rejected() {
        let mut circuit = Circuit::with_size("template", 1);
        circuit
            .ry(ParameterExpression::symbol("theta"), QubitId(0))
            .unwrap();
        let err = Statevector::from_circuit(&circuit).unwrap_err();
        assert!(matches!(err, SimError::UnboundParameter { gate: "ry", .. }));
    }

    #[test]
    fn test_term_outside_register() {
        let sv = Statevector::new(2).unwrap();
        let err = sv.pauli_expectation(&PauliTerm::z(1.0, 2)).unwrap_err();
        assert!(matches!(
            err,
            SimError::QubitOutOfRange {
                qubit: 2,
                n_qubits: 2
            }
        ));
    }
}
