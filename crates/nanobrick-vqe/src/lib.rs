//! Variational energy minimization for NanoBrick.
//!
//! Two material inputs, fiber ratio and binding energy, parameterize a
//! nearest-neighbour Pauli Hamiltonian. A fixed layered ansatz is tuned by a
//! derivative-free optimizer to minimize its expectation value.
//!
//! ```rust
//! use nanobrick_vqe::VqeOptimizer;
//!
//! let mut vqe = VqeOptimizer::with_seed(4, 7).unwrap();
//! let result = vqe.optimize(40.0, 50.0, 20).unwrap();
//!
//! assert_eq!(result.gate_count, 26);
//! assert_eq!(result.circuit_depth, 10);
//! assert!(result.optimal_energy <= result.initial_energy);
//! assert_eq!(result.energy_history.len(), result.iterations_completed + 1);
//! ```

pub mod ansatz;
pub mod error;
pub mod hamiltonian;
pub mod optimizers;
pub mod vqe;

pub use ansatz::{Ansatz, build_ansatz, num_parameters};
pub use error::{VqeError, VqeResult};
pub use hamiltonian::{HamiltonianCoefficients, build_hamiltonian};
pub use optimizers::{Cobyla, Minimum, Optimizer, Spsa};
pub use vqe::{MAX_ITERATIONS_CAP, OptimizationResult, VqeOptimizer, VqePhase};
