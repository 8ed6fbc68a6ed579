//! Simultaneous Perturbation Stochastic Approximation.
//!
//! Estimates the gradient from two evaluations along a random ±1 direction
//! per step, then re-evaluates at the updated point. Each step costs three
//! objective calls.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Budgeted, Minimum, Optimizer};

#[derive(Debug, Clone)]
pub struct Spsa {
    /// Step-size numerator.
    pub a: f64,
    /// Perturbation size.
    pub c: f64,
    /// Step-size decay exponent.
    pub alpha: f64,
    /// Perturbation decay exponent.
    pub gamma: f64,
    /// Seed for the perturbation directions.
    pub seed: u64,
}

impl Default for Spsa {
    fn default() -> Self {
        Self {
            a: 0.1,
            c: 0.1,
            alpha: 0.602,
            gamma: 0.101,
            seed: 42,
        }
    }
}

impl Spsa {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_gains(mut self, a: f64, c: f64) -> Self {
        self.a = a;
        self.c = c;
        self
    }
}

impl Optimizer for Spsa {
    #[allow(clippy::cast_precision_loss)]
    fn minimize<F, E>(
        &self,
        objective: F,
        initial: Vec<f64>,
        max_evaluations: usize,
    ) -> Result<Minimum, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut budget = Budgeted::new(objective, max_evaluations);
        let mut x = initial.clone();

        'search: {
            if budget.eval(&x)?.is_none() {
                break 'search;
            }

            for k in 1.. {
                let a_k = self.a / (k as f64).powf(self.alpha);
                let c_k = self.c / (k as f64).powf(self.gamma);

                let delta: Vec<f64> = (0..x.len())
                    .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
                    .collect();
                let x_plus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi + c_k * di).collect();
                let x_minus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi - c_k * di).collect();

                let Some(f_plus) = budget.eval(&x_plus)? else {
                    break 'search;
                };
                let Some(f_minus) = budget.eval(&x_minus)? else {
                    break 'search;
                };

                let slope = (f_plus - f_minus) / (2.0 * c_k);
                for (xi, di) in x.iter_mut().zip(&delta) {
                    // di is ±1, so dividing by it equals multiplying.
                    *xi -= a_k * slope * di;
                }

                if budget.eval(&x)?.is_none() {
                    break 'search;
                }
            }
        }

        Ok(budget.finish(initial, false))
    }
}
