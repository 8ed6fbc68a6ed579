//! DAG-based circuit representation.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::{EdgeRef, Topo};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq)]
pub enum DagNode {
    /// Start of a qubit wire.
    In(QubitId),
    /// End of a qubit wire.
    Out(QubitId),
    /// Gate application.
    Op(Instruction),
}

impl DagNode {
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// An edge in the circuit DAG: one segment of a qubit wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DagEdge {
    pub wire: QubitId,
}

/// DAG-based circuit representation.
///
/// - every qubit owns one `In` and one `Out` node
/// - an `Op` node sits on the wire of each of its operands
/// - edges along a wire run in application order
///
/// `wire_front` maps each qubit to the node just before its `Out` node, so
/// appending an instruction is O(arity).
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    graph: DiGraph<DagNode, DagEdge, u32>,
    qubit_inputs: FxHashMap<QubitId, NodeIndex>,
    qubit_outputs: FxHashMap<QubitId, NodeIndex>,
    wire_front: FxHashMap<QubitId, NodeIndex>,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a qubit wire. Adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.qubit_inputs.contains_key(&qubit) {
            return;
        }
        let in_node = self.graph.add_node(DagNode::In(qubit));
        let out_node = self.graph.add_node(DagNode::Out(qubit));
        self.graph.add_edge(in_node, out_node, DagEdge { wire: qubit });
        self.qubit_inputs.insert(qubit, in_node);
        self.qubit_outputs.insert(qubit, out_node);
        self.wire_front.insert(qubit, in_node);
    }

    /// Append an instruction at the end of its wires.
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let gate_name = instruction.name();

        let expected = instruction.gate.num_qubits() as usize;
        let got = instruction.qubits.len();
        if expected != got {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate_name.to_string(),
                expected: expected as u32,
                got: got as u32,
            });
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !self.qubit_inputs.contains_key(&qubit) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: Some(gate_name.to_string()),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(gate_name.to_string()),
                });
            }
        }

        let qubits = instruction.qubits.clone();
        let op_node = self.graph.add_node(DagNode::Op(instruction));

        for qubit in qubits {
            let out_node = self.qubit_outputs[&qubit];
            let prev_node = self.wire_front[&qubit];

            let eid = self
                .graph
                .edges_directed(prev_node, Direction::Outgoing)
                .find(|e| e.weight().wire == qubit && e.target() == out_node)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!(
                        "Missing edge from predecessor to output for wire {qubit}"
                    ))
                })?;
            self.graph.remove_edge(eid);
            self.graph.add_edge(prev_node, op_node, DagEdge { wire: qubit });
            self.graph.add_edge(op_node, out_node, DagEdge { wire: qubit });
            self.wire_front.insert(qubit, op_node);
        }

        Ok(op_node)
    }

    /// Iterate over operations in topological order.
    ///
    /// Nodes are only ever appended at wire ends, so the graph is acyclic and
    /// every operation is visited.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> + '_ {
        let mut topo = Topo::new(&self.graph);
        std::iter::from_fn(move || topo.next(&self.graph)).filter_map(|idx| {
            self.graph[idx].instruction().map(|inst| (idx, inst))
        })
    }

    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubit_inputs.len()
    }

    /// Get the number of operations.
    ///
    /// Total nodes minus the two boundary nodes per qubit.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph
            .node_count()
            .saturating_sub(2 * self.qubit_inputs.len())
    }

    /// Length of the longest chain of operations along any path.
    pub fn depth(&self) -> usize {
        let mut depths: FxHashMap<NodeIndex, usize> =
            FxHashMap::with_capacity_and_hasher(self.graph.node_count(), Default::default());
        let mut max_depth = 0usize;

        let mut topo = Topo::new(&self.graph);
        while let Some(node) = topo.next(&self.graph) {
            let max_pred_depth = self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths.get(&e.source()).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);

            let node_depth = if self.graph[node].is_op() {
                max_pred_depth + 1
            } else {
                max_pred_depth
            };

            max_depth = max_depth.max(node_depth);
            depths.insert(node, node_depth);
        }

        max_depth
    }

    /// Qubits in ascending order.
    pub fn qubits(&self) -> Vec<QubitId> {
        let mut qubits: Vec<_> = self.qubit_inputs.keys().copied().collect();
        qubits.sort_unstable();
        qubits
    }

    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }

    /// Check that the graph is acyclic and every wire runs unbroken from
    /// its `In` node to its `Out` node.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("Graph contains a cycle".into()));
        }

        for (&qubit, &in_node) in &self.qubit_inputs {
            let out_node = self.qubit_outputs.get(&qubit).copied().ok_or_else(|| {
                IrError::InvalidDag(format!("Qubit {qubit} has an In node but no Out node"))
            })?;

            let mut current = in_node;
            let max_steps = self.graph.node_count();
            for _ in 0..=max_steps {
                if current == out_node {
                    break;
                }
                current = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .find(|e| e.weight().wire == qubit)
                    .map(|e| e.target())
                    .ok_or_else(|| {
                        IrError::InvalidDag(format!(
                            "Wire for qubit {qubit} is broken at node {current:?}"
                        ))
                    })?;
            }
            if current != out_node {
                return Err(IrError::InvalidDag(format!(
                    "Wire for qubit {qubit} never reaches its output"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    fn dag_with(n: u32) -> CircuitDag {
        let mut dag = CircuitDag::new();
        for q in 0..n {
            dag.add_qubit(QubitId(q));
        }
        dag
    }

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new();
        assert_eq!(dag.num_qubits(), 0);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
    }

    #[test]
    fn test_add_qubit_is_idempotent() {
        let mut dag = dag_with(2);
        dag.add_qubit(QubitId(0));
        assert_eq!(dag.num_qubits(), 2);
        assert_eq!(dag.qubits(), vec![QubitId(0), QubitId(1)]);
    }

    #[test]
    fn test_bell_depth() {
        let mut dag = dag_with(2);
        dag.apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(0)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(0),
            QubitId(1),
        ))
        .unwrap();

        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 2);
        dag.verify_integrity().unwrap();
    }

    #[test]
    fn test_parallel_gates_depth() {
        let mut dag = dag_with(3);
        for q in 0..3 {
            dag.apply(Instruction::single_qubit_gate(
                StandardGate::Ry(0.5.into()),
                QubitId(q),
            ))
            .unwrap();
        }
        assert_eq!(dag.num_ops(), 3);
        assert_eq!(dag.depth(), 1);
    }

    #[test]
    fn test_cx_ladder_depth() {
        let mut dag = dag_with(4);
        for q in 0..3 {
            dag.apply(Instruction::two_qubit_gate(
                StandardGate::CX,
                QubitId(q),
                QubitId(q + 1),
            ))
            .unwrap();
        }
        assert_eq!(dag.depth(), 3);
    }

    #[test]
    fn test_topological_order_respects_wires() {
        let mut dag = dag_with(2);
        dag.apply(Instruction::single_qubit_gate(StandardGate::X, QubitId(1)))
            .unwrap();
        dag.apply(Instruction::two_qubit_gate(
            StandardGate::CX,
            QubitId(1),
            QubitId(0),
        ))
        .unwrap();
        dag.apply(Instruction::single_qubit_gate(StandardGate::Z, QubitId(0)))
            .unwrap();

        let names: Vec<_> = dag.topological_ops().map(|(_, inst)| inst.name()).collect();
        assert_eq!(names, vec!["x", "cx", "z"]);
    }

    #[test]
    fn test_gate_arity_mismatch() {
        let mut dag = dag_with(2);
        let err = dag
            .apply(Instruction::gate(StandardGate::CX, [QubitId(0)]))
            .unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_qubit_not_found_with_context() {
        let mut dag = dag_with(1);
        let err = dag
            .apply(Instruction::single_qubit_gate(StandardGate::H, QubitId(5)))
            .unwrap_err();
        assert!(err.to_string().contains("(gate: h)"));
    }

    #[test]
    fn test_duplicate_qubit() {
        let mut dag = dag_with(2);
        let err = dag
            .apply(Instruction::two_qubit_gate(
                StandardGate::CZ,
                QubitId(1),
                QubitId(1),
            ))
            .unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
        assert_eq!(dag.num_ops(), 0);
    }
}
