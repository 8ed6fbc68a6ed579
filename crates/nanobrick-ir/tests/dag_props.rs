//! Property-based tests for circuit DAG structure.
//!
//! Depth and operation counts depend only on which gates touch which wires,
//! never on rotation angles, and every accepted or rejected `apply` leaves a
//! well-formed DAG behind.

use std::f64::consts::PI;

use nanobrick_ir::{Circuit, Instruction, IrError, QubitId, StandardGate};
use proptest::prelude::*;

const MAX_OPS: usize = 24;

#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    Rx(u32),
    Ry(u32),
    Rz(u32),
    CX(u32, u32),
    CZ(u32, u32),
}

impl GateOp {
    fn apply(&self, circuit: &mut Circuit, angle: f64) -> Result<(), IrError> {
        match *self {
            GateOp::H(q) => circuit.h(QubitId(q)).map(|_| ()),
            GateOp::Rx(q) => circuit.rx(angle, QubitId(q)).map(|_| ()),
            GateOp::Ry(q) => circuit.ry(angle, QubitId(q)).map(|_| ()),
            GateOp::Rz(q) => circuit.rz(angle, QubitId(q)).map(|_| ()),
            GateOp::CX(c, t) => circuit.cx(QubitId(c), QubitId(t)).map(|_| ()),
            GateOp::CZ(c, t) => circuit.cz(QubitId(c), QubitId(t)).map(|_| ()),
        }
    }
}

/// Gates on distinct, in-range qubits of an `n`-qubit register (`n >= 2`).
fn arb_gate_op(n: u32) -> impl Strategy<Value = GateOp> {
    prop_oneof![
        (0..n).prop_map(GateOp::H),
        (0..n).prop_map(GateOp::Rx),
        (0..n).prop_map(GateOp::Ry),
        (0..n).prop_map(GateOp::Rz),
        (0..n, 1..n).prop_map(move |(c, off)| GateOp::CX(c, (c + off) % n)),
        (0..n, 1..n).prop_map(move |(c, off)| GateOp::CZ(c, (c + off) % n)),
    ]
}

fn arb_program() -> impl Strategy<Value = (u32, Vec<GateOp>)> {
    (2_u32..=5).prop_flat_map(|n| {
        (
            Just(n),
            prop::collection::vec(arb_gate_op(n), 0..=MAX_OPS),
        )
    })
}

fn arb_angles() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-PI..PI, MAX_OPS)
}

fn build(n: u32, ops: &[GateOp], angles: &[f64]) -> Circuit {
    let mut circuit = Circuit::with_size("props", n);
    for (op, &angle) in ops.iter().zip(angles) {
        op.apply(&mut circuit, angle)
            .expect("generated gates target distinct in-range qubits");
    }
    circuit
}

proptest! {
    #[test]
    fn structure_does_not_depend_on_angles(
        (n, ops) in arb_program(),
        a in arb_angles(),
        b in arb_angles(),
    ) {
        let first = build(n, &ops, &a);
        let second = build(n, &ops, &b);

        prop_assert_eq!(first.depth(), second.depth());
        prop_assert_eq!(first.gate_count(), second.gate_count());
        prop_assert_eq!(first.dag().num_ops(), second.dag().num_ops());
        prop_assert!(first.dag().verify_integrity().is_ok());
        prop_assert!(second.dag().verify_integrity().is_ok());
    }

    #[test]
    fn depth_is_bounded_by_op_count((n, ops) in arb_program(), angles in arb_angles()) {
        let circuit = build(n, &ops, &angles);

        prop_assert_eq!(circuit.gate_count(), ops.len());
        prop_assert_eq!(circuit.dag().num_ops(), ops.len());
        prop_assert!(circuit.depth() <= ops.len());
        // Each layer holds at most one op per wire.
        prop_assert!(circuit.depth() * n as usize >= ops.len());
        prop_assert_eq!(circuit.dag().topological_ops().count(), ops.len());
    }

    #[test]
    fn rejected_ops_leave_dag_unchanged(
        (n, ops) in arb_program(),
        angles in arb_angles(),
        q in 0_u32..5,
    ) {
        let mut circuit = build(n, &ops, &angles);
        let depth = circuit.depth();
        let count = circuit.gate_count();
        let q = q % n;

        let duplicate = circuit.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(q),
            QubitId(q),
        ));
        prop_assert!(
            matches!(duplicate, Err(IrError::DuplicateQubit { .. })),
            "duplicate operands must be rejected"
        );

        let missing = circuit.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(n)));
        prop_assert!(
            matches!(missing, Err(IrError::QubitNotFound { .. })),
            "unknown qubits must be rejected"
        );

        prop_assert_eq!(circuit.depth(), depth);
        prop_assert_eq!(circuit.gate_count(), count);
        prop_assert!(circuit.dag().verify_integrity().is_ok());
    }
}
