//! Variational energy minimizer.
//!
//! One [`VqeOptimizer::optimize`] call runs the full loop:
//!
//! ```text
//! Idle -> Initialized -> Iterating -> Converged | MaxIterReached -> Idle
//! ```
//!
//! The energy history is reset at the start of each call and receives one
//! entry per energy evaluation, starting with the initial point.

use std::f64::consts::PI;
use std::fmt;

use nanobrick_sim::{ExpectationEvaluator, StatevectorEstimator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ansatz::{build_ansatz, num_parameters};
use crate::error::{VqeError, VqeResult};
use crate::hamiltonian::build_hamiltonian;
use crate::optimizers::{Cobyla, Optimizer};

/// Hard ceiling on optimizer evaluations per call.
pub const MAX_ITERATIONS_CAP: usize = 100;

/// Stage of an `optimize` call, used in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VqePhase {
    Idle,
    Initialized,
    Iterating,
    Converged,
    MaxIterReached,
}

impl fmt::Display for VqePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VqePhase::Idle => "idle",
            VqePhase::Initialized => "initialized",
            VqePhase::Iterating => "iterating",
            VqePhase::Converged => "converged",
            VqePhase::MaxIterReached => "max_iter_reached",
        };
        f.write_str(name)
    }
}

/// Outcome of one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    /// Energy at the randomly sampled starting parameters.
    pub initial_energy: f64,
    /// Lowest energy seen; never above `initial_energy`.
    pub optimal_energy: f64,
    /// Optimizer evaluations, i.e. `energy_history.len() - 1`.
    pub iterations_completed: usize,
    pub energy_history: Vec<f64>,
    pub optimal_parameters: Vec<f64>,
    pub circuit_depth: usize,
    pub gate_count: usize,
    pub converged: bool,
}

/// Minimizes the material Hamiltonian's energy over ansatz parameters.
///
/// The qubit count is fixed at construction. Each instance owns its random
/// source, so runs built with [`VqeOptimizer::with_seed`] are reproducible.
pub struct VqeOptimizer<E = StatevectorEstimator, O = Cobyla> {
    num_qubits: usize,
    rng: StdRng,
    evaluator: E,
    optimizer: O,
    energy_history: Vec<f64>,
    phase: VqePhase,
}

impl VqeOptimizer {
    /// Create an optimizer seeded from OS entropy.
    pub fn new(num_qubits: usize) -> VqeResult<Self> {
        Self::with_rng(num_qubits, StdRng::from_entropy())
    }

    /// Create an optimizer with a fixed seed.
    pub fn with_seed(num_qubits: usize, seed: u64) -> VqeResult<Self> {
        Self::with_rng(num_qubits, StdRng::seed_from_u64(seed))
    }

    fn with_rng(num_qubits: usize, rng: StdRng) -> VqeResult<Self> {
        if num_qubits < 2 {
            return Err(VqeError::InvalidQubitCount(num_qubits));
        }
        Ok(Self {
            num_qubits,
            rng,
            evaluator: StatevectorEstimator::new(),
            optimizer: Cobyla::new(),
            energy_history: Vec::new(),
            phase: VqePhase::Idle,
        })
    }
}

impl<E, O> VqeOptimizer<E, O>
where
    E: ExpectationEvaluator,
    O: Optimizer,
{
    /// Replace the expectation-value evaluator.
    pub fn with_evaluator<E2: ExpectationEvaluator>(self, evaluator: E2) -> VqeOptimizer<E2, O> {
        VqeOptimizer {
            num_qubits: self.num_qubits,
            rng: self.rng,
            evaluator,
            optimizer: self.optimizer,
            energy_history: self.energy_history,
            phase: self.phase,
        }
    }

    /// Replace the optimization strategy.
    pub fn with_optimizer<O2: Optimizer>(self, optimizer: O2) -> VqeOptimizer<E, O2> {
        VqeOptimizer {
            num_qubits: self.num_qubits,
            rng: self.rng,
            evaluator: self.evaluator,
            optimizer,
            energy_history: self.energy_history,
            phase: self.phase,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// History of the most recent `optimize` call.
    pub fn energy_history(&self) -> &[f64] {
        &self.energy_history
    }

    pub fn phase(&self) -> VqePhase {
        self.phase
    }

    /// Run one optimization for the given material inputs.
    ///
    /// `max_iterations` is the optimizer's evaluation budget, capped at
    /// [`MAX_ITERATIONS_CAP`]. Zero performs only the initial evaluation.
    /// Evaluator failures abort the run and are returned unchanged.
    pub fn optimize(
        &mut self,
        fiber_ratio: f64,
        binding_energy: f64,
        max_iterations: usize,
    ) -> VqeResult<OptimizationResult> {
        let result = self.run(fiber_ratio, binding_energy, max_iterations);
        self.phase = VqePhase::Idle;
        result
    }

    fn run(
        &mut self,
        fiber_ratio: f64,
        binding_energy: f64,
        max_iterations: usize,
    ) -> VqeResult<OptimizationResult> {
        let n = self.num_qubits;
        let budget = max_iterations.min(MAX_ITERATIONS_CAP);
        tracing::info!(
            num_qubits = n,
            fiber_ratio,
            binding_energy,
            budget,
            "starting variational optimization"
        );

        self.energy_history.clear();
        let hamiltonian = build_hamiltonian(fiber_ratio, binding_energy, n)?;
        let initial: Vec<f64> = (0..num_parameters(n))
            .map(|_| self.rng.gen_range(-PI..=PI))
            .collect();

        let evaluator = &self.evaluator;
        let history = &mut self.energy_history;
        let mut energy = |params: &[f64]| -> VqeResult<f64> {
            let ansatz = build_ansatz(params, n)?;
            let value = evaluator.evaluate(ansatz.circuit(), &hamiltonian)?;
            history.push(value);
            tracing::trace!(evaluation = history.len(), energy = value, "energy evaluated");
            Ok(value)
        };

        let initial_energy = energy(&initial)?;
        self.phase = VqePhase::Initialized;
        tracing::debug!(phase = %self.phase, initial_energy, "initial state evaluated");

        self.phase = VqePhase::Iterating;
        let minimum = self.optimizer.minimize(&mut energy, initial.clone(), budget)?;

        self.phase = if minimum.converged {
            VqePhase::Converged
        } else {
            VqePhase::MaxIterReached
        };

        let (optimal_parameters, optimal_energy) = if minimum.value < initial_energy {
            (minimum.params, minimum.value)
        } else {
            (initial, initial_energy)
        };

        let ansatz = build_ansatz(&optimal_parameters, n)?;
        let result = OptimizationResult {
            initial_energy,
            optimal_energy,
            iterations_completed: self.energy_history.len() - 1,
            energy_history: self.energy_history.clone(),
            optimal_parameters,
            circuit_depth: ansatz.depth(),
            gate_count: ansatz.gate_count(),
            converged: minimum.converged,
        };

        tracing::info!(
            phase = %self.phase,
            initial_energy = result.initial_energy,
            optimal_energy = result.optimal_energy,
            iterations = result.iterations_completed,
            "variational optimization finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanobrick_ir::Circuit;
    use nanobrick_sim::{PauliHamiltonian, SimError, SimResult};

    struct ConstantEvaluator(f64);

    impl ExpectationEvaluator for ConstantEvaluator {
        fn evaluate(&self, _: &Circuit, _: &PauliHamiltonian) -> SimResult<f64> {
            Ok(self.0)
        }
    }

    struct FailingEvaluator;

    impl ExpectationEvaluator for FailingEvaluator {
        fn evaluate(&self, _: &Circuit, _: &PauliHamiltonian) -> SimResult<f64> {
            Err(SimError::TooManyQubits { got: 99, max: 1 })
        }
    }

    #[test]
    fn test_rejects_single_qubit() {
        assert!(matches!(
            VqeOptimizer::with_seed(1, 0),
            Err(VqeError::InvalidQubitCount(1))
        ));
    }

    #[test]
    fn test_zero_iterations() {
        let mut vqe = VqeOptimizer::with_seed(4, 11).unwrap();
        let result = vqe.optimize(40.0, 50.0, 0).unwrap();
        assert_eq!(result.energy_history.len(), 1);
        assert_eq!(result.iterations_completed, 0);
        assert_eq!(result.initial_energy, result.optimal_energy);
        assert!(!result.converged);
        assert_eq!(vqe.phase(), VqePhase::Idle);
    }

    #[test]
    fn test_history_reset_between_calls() {
        let mut vqe = VqeOptimizer::with_seed(2, 5).unwrap();
        vqe.optimize(40.0, 50.0, 10).unwrap();
        let second = vqe.optimize(40.0, 50.0, 3).unwrap();
        assert_eq!(second.energy_history.len(), 4);
        assert_eq!(vqe.energy_history().len(), 4);
    }

    #[test]
    fn test_budget_is_capped() {
        let mut vqe = VqeOptimizer::with_seed(2, 3).unwrap();
        let result = vqe.optimize(40.0, 50.0, 1000).unwrap();
        assert!(result.iterations_completed <= MAX_ITERATIONS_CAP);
    }

    #[test]
    fn test_constant_evaluator() {
        let mut vqe = VqeOptimizer::with_seed(3, 1)
            .unwrap()
            .with_evaluator(ConstantEvaluator(-2.5));
        let result = vqe.optimize(10.0, 20.0, 5).unwrap();
        assert_eq!(result.initial_energy, -2.5);
        assert_eq!(result.optimal_energy, -2.5);
        assert!(result.energy_history.iter().all(|&e| e == -2.5));
    }

    #[test]
    fn test_evaluator_error_propagates() {
        let mut vqe = VqeOptimizer::with_seed(2, 0)
            .unwrap()
            .with_evaluator(FailingEvaluator);
        let err = vqe.optimize(40.0, 50.0, 10).unwrap_err();
        assert!(matches!(
            err,
            VqeError::Evaluator(SimError::TooManyQubits { got: 99, max: 1 })
        ));
        assert_eq!(vqe.phase(), VqePhase::Idle);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let mut vqe = VqeOptimizer::with_seed(2, 9).unwrap();
        let result = vqe.optimize(40.0, 50.0, 2).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("initialEnergy").is_some());
        assert!(json.get("iterationsCompleted").is_some());
        assert_eq!(json["gateCount"], 12);
        assert_eq!(json["circuitDepth"], 7);
    }
}
