//! Common strategy abstraction.

use rand::prelude::*;
use sb_types::EvalResult;
use serde::{Deserialize, Serialize};

/// Best solution a single strategy found, with the budget it spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    /// Minimizing point, in unit-cube coordinates.
    pub point: Vec<f64>,
    /// Objective value at `point`.
    pub value: f64,
    /// Number of objective evaluations consumed.
    pub evaluations: u64,
}

/// Common trait for all search strategies.
///
/// Strategies *minimize* the given objective over the unit hypercube
/// `[0, 1]^dim`.  The ensemble handles the negation needed to turn the
/// adversarial maximization into a minimization.
pub trait SearchStrategy: Send + Sync {
    /// Run the search to completion (or budget exhaustion) and return the
    /// best solution found.  `seed` is an optional informative starting
    /// point; strategies are free to ignore it.
    fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        dim: usize,
        seed: Option<&[f64]>,
    ) -> EvalResult<StrategyOutcome>;

    /// Human-readable strategy name.
    fn name(&self) -> &'static str;
}

/// RNG from an explicit seed (reproducible runs) or thread entropy.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Clamp a point into the unit hypercube in place.
pub(crate) fn clamp_unit(x: &mut [f64]) {
    for v in x.iter_mut() {
        *v = v.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_unit() {
        let mut x = vec![-0.5, 0.25, 1.75];
        clamp_unit(&mut x);
        assert_eq!(x, vec![0.0, 0.25, 1.0]);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = make_rng(Some(7));
        let mut b = make_rng(Some(7));
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }
}
