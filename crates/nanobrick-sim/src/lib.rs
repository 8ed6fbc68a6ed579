//! Exact expectation values for NanoBrick ansatz circuits.
//!
//! - [`hamiltonian`]: weighted sums of Pauli strings
//! - [`statevector`]: dense double-precision state simulation
//! - [`estimator`]: the [`ExpectationEvaluator`] seam used by the optimizer
//!
//! ```rust
//! use nanobrick_ir::{Circuit, QubitId};
//! use nanobrick_sim::{ExpectationEvaluator, PauliHamiltonian, PauliTerm, StatevectorEstimator};
//!
//! let circuit = Circuit::with_size("zero", 1);
//! let h = PauliHamiltonian::new(vec![PauliTerm::z(0.5, 0)]);
//! let energy = StatevectorEstimator::new().evaluate(&circuit, &h).unwrap();
//! assert!((energy - 0.5).abs() < 1e-12);
//! ```

pub mod error;
pub mod estimator;
pub mod hamiltonian;
pub mod statevector;

pub use error::{SimError, SimResult};
pub use estimator::{ExpectationEvaluator, StatevectorEstimator};
pub use hamiltonian::{Pauli, PauliHamiltonian, PauliTerm};
pub use statevector::{MAX_QUBITS, Statevector};
