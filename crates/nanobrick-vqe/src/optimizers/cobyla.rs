//! Trust-region simplex minimizer in the spirit of COBYLA.
//!
//! The simplex steps are bounded by a trust radius `rho` that starts at
//! `rhobeg` and halves whenever the simplex collapses, down to `rhoend`.

use super::{Budgeted, Minimum, Optimizer};

/// COBYLA-style optimizer configuration.
#[derive(Debug, Clone)]
pub struct Cobyla {
    /// Maximum simplex iterations, independent of the evaluation budget.
    pub maxiter: usize,
    /// Spread of simplex values below which the radius shrinks.
    pub tol: f64,
    /// Initial trust region radius.
    pub rhobeg: f64,
    /// Final trust region radius.
    pub rhoend: f64,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            maxiter: 1000,
            tol: 1e-6,
            rhobeg: 0.5,
            rhoend: 1e-4,
        }
    }
}

impl Cobyla {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    #[must_use]
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    #[must_use]
    pub fn with_trust_region(mut self, rhobeg: f64, rhoend: f64) -> Self {
        self.rhobeg = rhobeg;
        self.rhoend = rhoend;
        self
    }
}

/// Evaluate or stop the search when the budget is gone.
macro_rules! eval_or_stop {
    ($budget:expr, $x:expr, $label:lifetime) => {
        match $budget.eval($x)? {
            Some(v) => v,
            None => break $label,
        }
    };
}

impl Optimizer for Cobyla {
    #[allow(clippy::too_many_lines, clippy::cast_precision_loss)]
    fn minimize<F, E>(
        &self,
        objective: F,
        initial: Vec<f64>,
        max_evaluations: usize,
    ) -> Result<Minimum, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let n = initial.len();
        let mut budget = Budgeted::new(objective, max_evaluations);
        let mut converged = false;

        'search: {
            let f0 = eval_or_stop!(budget, &initial, 'search);
            let mut simplex: Vec<Vec<f64>> = vec![initial.clone()];
            let mut f_simplex: Vec<f64> = vec![f0];

            for i in 0..n {
                let mut point = initial.clone();
                point[i] += self.rhobeg;
                let f_point = eval_or_stop!(budget, &point, 'search);
                simplex.push(point);
                f_simplex.push(f_point);
            }

            if n == 0 {
                converged = true;
                break 'search;
            }

            let mut rho = self.rhobeg;

            for _iteration in 0..self.maxiter {
                let mut indices: Vec<usize> = (0..=n).collect();
                indices.sort_by(|&a, &b| f_simplex[a].total_cmp(&f_simplex[b]));

                let best_idx = indices[0];
                let second_worst_idx = indices[n - 1];
                let worst_idx = indices[n];

                let spread = f_simplex[worst_idx] - f_simplex[best_idx];
                if spread < self.tol && rho <= self.rhoend {
                    converged = true;
                    break 'search;
                }

                // Collapsed simplex: halve the radius and rebuild around the best point.
                if spread < self.tol {
                    rho = (rho * 0.5).max(self.rhoend);
                    let best = simplex[best_idx].clone();
                    let f_best = f_simplex[best_idx];
                    simplex = vec![best.clone()];
                    f_simplex = vec![f_best];

                    for i in 0..n {
                        let mut point = best.clone();
                        point[i] += rho;
                        let f_point = eval_or_stop!(budget, &point, 'search);
                        simplex.push(point);
                        f_simplex.push(f_point);
                    }
                    continue;
                }

                let mut centroid = vec![0.0; n];
                for &idx in &indices[..n] {
                    for (c, x) in centroid.iter_mut().zip(&simplex[idx]) {
                        *c += x;
                    }
                }
                for c in &mut centroid {
                    *c /= n as f64;
                }

                // Reflection, clipped to the trust radius.
                let reflected: Vec<f64> = centroid
                    .iter()
                    .zip(&simplex[worst_idx])
                    .map(|(c, w)| {
                        let step = c - w;
                        c + step.clamp(-rho, rho)
                    })
                    .collect();
                let f_reflected = eval_or_stop!(budget, &reflected, 'search);

                if f_reflected < f_simplex[best_idx] {
                    let expanded: Vec<f64> = centroid
                        .iter()
                        .zip(&reflected)
                        .map(|(c, r)| c + 2.0 * (r - c))
                        .collect();
                    let f_expanded = eval_or_stop!(budget, &expanded, 'search);

                    if f_expanded < f_reflected {
                        simplex[worst_idx] = expanded;
                        f_simplex[worst_idx] = f_expanded;
                    } else {
                        simplex[worst_idx] = reflected;
                        f_simplex[worst_idx] = f_reflected;
                    }
                } else if f_reflected < f_simplex[second_worst_idx] {
                    simplex[worst_idx] = reflected;
                    f_simplex[worst_idx] = f_reflected;
                } else {
                    let contracted: Vec<f64> = centroid
                        .iter()
                        .zip(&simplex[worst_idx])
                        .map(|(c, w)| 0.5 * (c + w))
                        .collect();
                    let f_contracted = eval_or_stop!(budget, &contracted, 'search);

                    if f_contracted < f_simplex[worst_idx] {
                        simplex[worst_idx] = contracted;
                        f_simplex[worst_idx] = f_contracted;
                    } else {
                        // Shrink toward the best vertex.
                        let best = simplex[best_idx].clone();
                        for i in (0..=n).filter(|&i| i != best_idx) {
                            for (x, b) in simplex[i].iter_mut().zip(&best) {
                                *x = 0.5 * (b + *x);
                            }
                            f_simplex[i] = eval_or_stop!(budget, &simplex[i], 'search);
                        }
                    }
                }
            }
        }

        let result = budget.finish(initial, converged);
        tracing::debug!(
            evaluations = result.evaluations,
            value = result.value,
            converged = result.converged,
            "cobyla finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn quadratic(params: &[f64]) -> Result<f64, Infallible> {
        Ok((params[0] - 1.0).powi(2) + (params[1] - 2.0).powi(2))
    }

    #[test]
    fn test_cobyla_simple() {
        let result = Cobyla::new()
            .minimize(quadratic, vec![0.0, 0.0], 2000)
            .unwrap();

        assert!(result.value < 0.01);
        assert!((result.params[0] - 1.0).abs() < 0.1);
        assert!((result.params[1] - 2.0).abs() < 0.1);
    }

    #[test]
    fn test_cobyla_rosenbrock_improves() {
        let result = Cobyla::new()
            .minimize(
                |p: &[f64]| -> Result<f64, Infallible> {
                    Ok((1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0].powi(2)).powi(2))
                },
                vec![0.0, 0.0],
                3000,
            )
            .unwrap();
        assert!(result.value < 1.0);
    }

    #[test]
    fn test_budget_is_exact_upper_bound() {
        let mut calls = 0usize;
        let result = Cobyla::new()
            .minimize(
                |p: &[f64]| -> Result<f64, Infallible> {
                    calls += 1;
                    quadratic(p)
                },
                vec![0.0, 0.0],
                7,
            )
            .unwrap();
        assert_eq!(result.evaluations, 7);
        assert_eq!(calls, 7);
        assert!(!result.converged);
    }

    #[test]
    fn test_first_evaluation_is_initial_point() {
        let mut seen = Vec::new();
        Cobyla::new()
            .minimize(
                |p: &[f64]| -> Result<f64, Infallible> {
                    seen.push(p.to_vec());
                    quadratic(p)
                },
                vec![0.25, -0.5],
                3,
            )
            .unwrap();
        assert_eq!(seen[0], vec![0.25, -0.5]);
        assert_eq!(seen[1], vec![0.75, -0.5]);
        assert_eq!(seen[2], vec![0.25, 0.0]);
    }

    #[test]
    fn test_zero_budget() {
        let result = Cobyla::new()
            .minimize(quadratic, vec![5.0, 5.0], 0)
            .unwrap();
        assert_eq!(result.evaluations, 0);
        assert_eq!(result.params, vec![5.0, 5.0]);
        assert!(result.value.is_infinite());
    }

    #[test]
    fn test_best_never_worse_than_start() {
        let start = vec![0.2, 0.9];
        let f_start = quadratic(&start).unwrap();
        for budget in 1..15 {
            let result = Cobyla::new().minimize(quadratic, start.clone(), budget).unwrap();
            assert!(result.value <= f_start);
        }
    }

    #[test]
    fn test_converges_on_flat_objective() {
        let result = Cobyla::new()
            .minimize(
                |_: &[f64]| -> Result<f64, Infallible> { Ok(1.0) },
                vec![0.0, 0.0],
                10_000,
            )
            .unwrap();
        assert!(result.converged);
        assert_eq!(result.value, 1.0);
    }

    #[test]
    fn test_objective_error_aborts() {
        let mut calls = 0;
        let err = Cobyla::new()
            .minimize(
                |_: &[f64]| -> Result<f64, String> {
                    calls += 1;
                    if calls == 3 {
                        Err("evaluator failed".to_string())
                    } else {
                        Ok(0.0)
                    }
                },
                vec![0.0, 0.0],
                100,
            )
            .unwrap_err();
        assert_eq!(err, "evaluator failed");
        assert_eq!(calls, 3);
    }
}
