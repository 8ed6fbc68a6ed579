//! Derivative-free optimizers for variational energy minimization.
//!
//! Both strategies work against an evaluation budget rather than an
//! iteration count: every call to the objective costs one unit, and the
//! search stops as soon as the budget is spent. The best point ever
//! evaluated is returned, not the last one.

mod cobyla;
mod spsa;

pub use cobyla::Cobyla;
pub use spsa::Spsa;

/// Outcome of a bounded minimization.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best parameters seen.
    pub params: Vec<f64>,
    /// Objective value at `params`; `+∞` when nothing was evaluated.
    pub value: f64,
    /// Objective calls performed.
    pub evaluations: usize,
    /// Whether the strategy's own stopping criterion fired before the
    /// budget ran out.
    pub converged: bool,
}

/// A derivative-free minimization strategy.
///
/// The objective is fallible; the first error aborts the search and is
/// returned as-is.
pub trait Optimizer {
    fn minimize<F, E>(
        &self,
        objective: F,
        initial: Vec<f64>,
        max_evaluations: usize,
    ) -> Result<Minimum, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>;
}

/// Objective wrapper that enforces the budget and remembers the best point.
struct Budgeted<F> {
    objective: F,
    budget: usize,
    evaluations: usize,
    best: Option<(Vec<f64>, f64)>,
}

impl<F> Budgeted<F> {
    fn new(objective: F, budget: usize) -> Self {
        Self {
            objective,
            budget,
            evaluations: 0,
            best: None,
        }
    }

    /// Evaluate `x`, or `None` once the budget is spent.
    fn eval<E>(&mut self, x: &[f64]) -> Result<Option<f64>, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        if self.evaluations >= self.budget {
            return Ok(None);
        }
        let value = (self.objective)(x)?;
        self.evaluations += 1;
        let improves = match &self.best {
            Some((_, best)) => value < *best,
            None => !value.is_nan(),
        };
        if improves {
            self.best = Some((x.to_vec(), value));
        }
        Ok(Some(value))
    }

    fn finish(self, initial: Vec<f64>, converged: bool) -> Minimum {
        match self.best {
            Some((params, value)) => Minimum {
                params,
                value,
                evaluations: self.evaluations,
                converged,
            },
            None => Minimum {
                params: initial,
                value: f64::INFINITY,
                evaluations: self.evaluations,
                converged: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[test]
    fn test_budget_is_enforced() {
        let mut calls = 0;
        let mut b = Budgeted::new(
            |x: &[f64]| -> Result<f64, Infallible> {
                calls += 1;
                Ok(x[0])
            },
            2,
        );
        assert_eq!(b.eval(&[3.0]).unwrap(), Some(3.0));
        assert_eq!(b.eval(&[1.0]).unwrap(), Some(1.0));
        assert_eq!(b.eval(&[0.0]).unwrap(), None);

        let m = b.finish(vec![9.0], true);
        assert_eq!(m.params, vec![1.0]);
        assert_eq!(m.value, 1.0);
        assert_eq!(m.evaluations, 2);
        assert!(m.converged);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_empty_budget() {
        let b = Budgeted::new(|_: &[f64]| -> Result<f64, Infallible> { Ok(0.0) }, 0);
        let m = b.finish(vec![1.0, 2.0], true);
        assert_eq!(m.params, vec![1.0, 2.0]);
        assert!(m.value.is_infinite());
        assert_eq!(m.evaluations, 0);
        assert!(!m.converged);
    }

    #[test]
    fn test_error_propagates() {
        let mut b = Budgeted::new(|_: &[f64]| -> Result<f64, &str> { Err("boom") }, 5);
        assert_eq!(b.eval(&[0.0]), Err("boom"));
        assert_eq!(b.evaluations, 0);
    }
}
