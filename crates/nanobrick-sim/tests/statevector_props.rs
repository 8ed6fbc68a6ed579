//! Property-based tests for the statevector simulator.
//!
//! Random rotation/entangler circuits must keep the state normalised and
//! keep every Pauli expectation inside [-1, 1].

use nanobrick_ir::{Circuit, QubitId};
use nanobrick_sim::{Pauli, PauliTerm, Statevector};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum GateOp {
    Rx(u32, f64),
    Ry(u32, f64),
    Rz(u32, f64),
    H(u32),
    CX(u32, u32),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        match self {
            GateOp::Rx(q, t) => {
                let _ = circuit.rx(t, QubitId(q));
            }
            GateOp::Ry(q, t) => {
                let _ = circuit.ry(t, QubitId(q));
            }
            GateOp::Rz(q, t) => {
                let _ = circuit.rz(t, QubitId(q));
            }
            GateOp::H(q) => {
                let _ = circuit.h(QubitId(q));
            }
            GateOp::CX(c, t) => {
                // Same-qubit pairs are rejected by the builder and skipped.
                let _ = circuit.cx(QubitId(c), QubitId(t));
            }
        }
    }
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    let angle = -std::f64::consts::PI..std::f64::consts::PI;
    prop_oneof![
        (0..num_qubits, angle.clone()).prop_map(|(q, t)| GateOp::Rx(q, t)),
        (0..num_qubits, angle.clone()).prop_map(|(q, t)| GateOp::Ry(q, t)),
        (0..num_qubits, angle).prop_map(|(q, t)| GateOp::Rz(q, t)),
        (0..num_qubits).prop_map(GateOp::H),
        (0..num_qubits, 0..num_qubits).prop_map(|(c, t)| GateOp::CX(c, t)),
    ]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (2_u32..=5).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 1..=30).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("random", num_qubits);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

fn arb_pauli() -> impl Strategy<Value = Pauli> {
    prop_oneof![Just(Pauli::X), Just(Pauli::Y), Just(Pauli::Z)]
}

proptest! {
    #[test]
    fn state_stays_normalised(circuit in arb_circuit()) {
        let sv = Statevector::from_circuit(&circuit).unwrap();
        prop_assert!((sv.norm_sqr() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pauli_expectation_is_bounded(
        circuit in arb_circuit(),
        p0 in arb_pauli(),
        p1 in arb_pauli(),
    ) {
        let sv = Statevector::from_circuit(&circuit).unwrap();
        let term = PauliTerm::new(1.0, vec![(0, p0), (1, p1)]);
        let value = sv.pauli_expectation(&term).unwrap();
        prop_assert!(value.abs() <= 1.0 + 1e-9);
    }
}
