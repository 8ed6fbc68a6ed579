//! Variational optimization endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::{Json, extract::State};
use nanobrick_vqe::{MAX_ITERATIONS_CAP, OptimizationResult, VqeOptimizer, VqeResult};

use crate::api::elapsed_ms;
use crate::dto::{
    EnergySample, OptimalConfiguration, OptimizationSummary, OptimizeRequest, OptimizeResponse,
    QuantumMetrics, round_dp,
};
use crate::error::ApiError;
use crate::state::AppState;

const BACKEND: &str = "NanoBrick StatevectorEstimator";
const ANSATZ: &str = "RY-RZ with CNOT entanglement";
const ALGORITHM: &str = "VQE with COBYLA optimizer (statevector simulation)";

/// Run one energy minimization and derive the material configuration.
///
/// The optimizer runs on the blocking pool under the configured timeout.
pub async fn optimize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    let start = Instant::now();
    let num_qubits = state.config.quantum.num_qubits;
    let seed = state.config.quantum.seed;
    let timeout = state.config.server.optimize_timeout();
    let max_iterations = req.iterations.min(MAX_ITERATIONS_CAP);
    let (fiber_ratio, binding_energy) = (req.fiber_ratio, req.binding_energy);

    let job = tokio::task::spawn_blocking(move || -> VqeResult<OptimizationResult> {
        let mut vqe = match seed {
            Some(seed) => VqeOptimizer::with_seed(num_qubits, seed)?,
            None => VqeOptimizer::new(num_qubits)?,
        };
        vqe.optimize(fiber_ratio, binding_energy, max_iterations)
    });

    let result = tokio::time::timeout(timeout, job)
        .await
        .map_err(|_| {
            ApiError::Optimization(format!(
                "optimization timed out after {}s",
                timeout.as_secs()
            ))
        })?
        .map_err(|e| ApiError::Optimization(format!("optimization task failed: {e}")))??;

    tracing::info!(
        initial_energy = result.initial_energy,
        optimal_energy = result.optimal_energy,
        iterations = result.iterations_completed,
        "optimize request completed"
    );

    Ok(Json(summarize(
        &result,
        &req,
        num_qubits,
        elapsed_ms(start),
    )))
}

/// Percent decrease from `initial` to `optimal`; zero when `initial` is zero.
pub fn energy_reduction(initial: f64, optimal: f64) -> f64 {
    if initial == 0.0 {
        0.0
    } else {
        ((initial - optimal) / initial.abs() * 100.0).abs()
    }
}

/// Every `max(1, len / 10)`-th history entry.
pub fn sample_history(history: &[f64]) -> Vec<EnergySample> {
    let step = (history.len() / 10).max(1);
    history
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(iteration, &energy)| EnergySample {
            iteration,
            energy: round_dp(energy, 6),
        })
        .collect()
}

/// Material scores from the inputs and the ground-state factor `|E| / 3`.
pub fn optimal_configuration(
    fiber_ratio: f64,
    binding_energy: f64,
    optimal_energy: f64,
) -> OptimalConfiguration {
    let g = optimal_energy.abs() / 3.0;
    OptimalConfiguration {
        cellulose_alignment: round_dp(70.0 + fiber_ratio * 0.3 + g * 10.0, 1),
        polymer_binding: round_dp(60.0 + binding_energy * 0.4 + g * 8.0, 1),
        nanofiber_distribution: round_dp(75.0 + (fiber_ratio + binding_energy) * 0.1 + g * 5.0, 1),
        crystallinity_index: round_dp(80.0 + g * 15.0, 1),
    }
}

fn summarize(
    result: &OptimizationResult,
    req: &OptimizeRequest,
    num_qubits: usize,
    processing_time_ms: u64,
) -> OptimizeResponse {
    OptimizeResponse {
        success: true,
        real_quantum: true,
        optimization: OptimizationSummary {
            initial_energy: round_dp(result.initial_energy, 6),
            optimal_energy: round_dp(result.optimal_energy, 6),
            energy_reduction: round_dp(
                energy_reduction(result.initial_energy, result.optimal_energy),
                2,
            ),
            iterations_completed: result.iterations_completed,
            convergence_achieved: result.converged,
        },
        quantum_metrics: QuantumMetrics {
            qubits_used: num_qubits,
            circuit_depth: result.circuit_depth,
            gate_count: result.gate_count,
            backend: BACKEND.to_string(),
            ansatz: ANSATZ.to_string(),
        },
        optimal_configuration: optimal_configuration(
            req.fiber_ratio,
            req.binding_energy,
            result.optimal_energy,
        ),
        energy_history: sample_history(&result.energy_history),
        algorithm: ALGORITHM.to_string(),
        processing_time_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_reduction() {
        assert_eq!(energy_reduction(0.0, -1.0), 0.0);
        assert_eq!(energy_reduction(-2.0, -3.0), 50.0);
        assert_eq!(energy_reduction(1.0, -1.0), 200.0);
    }

    #[test]
    fn test_sample_history_short() {
        let samples = sample_history(&[1.0, 0.5, 0.25]);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[2].iteration, 2);
    }

    #[test]
    fn test_sample_history_stride() {
        let history: Vec<f64> = (0..51).map(f64::from).collect();
        let samples = sample_history(&history);
        let iterations: Vec<usize> = samples.iter().map(|s| s.iteration).collect();
        assert_eq!(iterations, vec![0, 5, 10, 15, 20, 25, 30, 35, 40, 45, 50]);
    }

    #[test]
    fn test_optimal_configuration_at_zero_energy() {
        let c = optimal_configuration(40.0, 50.0, 0.0);
        assert_eq!(c.cellulose_alignment, 82.0);
        assert_eq!(c.polymer_binding, 80.0);
        assert_eq!(c.nanofiber_distribution, 84.0);
        assert_eq!(c.crystallinity_index, 80.0);
    }

    #[test]
    fn test_optimal_configuration_uses_magnitude() {
        let low = optimal_configuration(40.0, 50.0, -3.0);
        let high = optimal_configuration(40.0, 50.0, 3.0);
        assert_eq!(low, high);
        // g = 1
        assert_eq!(low.crystallinity_index, 95.0);
    }
}
