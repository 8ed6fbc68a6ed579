//! NanoBrick circuit representation
//!
//! Parameterized circuits built by the variational optimizer are stored as a
//! DAG of gate instructions. The DAG gives two structural metrics that the
//! optimizer reports back to callers: [`Circuit::depth`] (longest chain of
//! sequential operations on any wire) and [`Circuit::gate_count`].
//!
//! # Example
//!
//! ```rust
//! use nanobrick_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("pair", 2);
//! circuit.ry(0.3, QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.gate_count(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits |
//! |------|--------|
//! | `I`, `X`, `Y`, `Z`, `H` | 1 |
//! | `Rx`, `Ry`, `Rz` | 1 |
//! | `CX`, `CZ` | 2 |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::Instruction;
pub use parameter::ParameterExpression;
pub use qubit::QubitId;
