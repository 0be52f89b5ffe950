//! The worst-case ensemble: heterogeneous strategies reduced by max.

use sb_types::{EvalError, EvalResult, StrategyReport, WorstCaseReport};
use tracing::debug;

use crate::basin_hopping::BasinHopping;
use crate::cmaes::CmaEs;
use crate::de::DifferentialEvolution;
use crate::strategy::SearchStrategy;

/// Worst-case response search engine.
///
/// Estimates `max_y f(x0, y)` over the unit hypercube by running every
/// member strategy strictly sequentially against the negated objective and
/// keeping the best (maximal) un-negated value.  `y0` seeds the strategies
/// that use a starting point.
pub struct WorstCaseSearch {
    strategies: Vec<Box<dyn SearchStrategy>>,
}

impl std::fmt::Debug for WorstCaseSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorstCaseSearch")
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

impl Default for WorstCaseSearch {
    fn default() -> Self {
        Self {
            strategies: vec![
                Box::new(BasinHopping::default()),
                Box::new(CmaEs::default()),
                Box::new(DifferentialEvolution::default()),
            ],
        }
    }
}

impl WorstCaseSearch {
    /// Build an ensemble from explicit strategies.
    ///
    /// Rejects an empty ensemble: a worst case over no strategies is
    /// undefined.
    pub fn new(strategies: Vec<Box<dyn SearchStrategy>>) -> EvalResult<Self> {
        if strategies.is_empty() {
            return Err(EvalError::InvalidConfig(
                "worst-case ensemble needs at least one strategy".to_string(),
            ));
        }
        Ok(Self { strategies })
    }

    /// The default three-strategy ensemble with all RNGs seeded, for
    /// reproducible runs.
    #[must_use]
    pub fn seeded(rng_seed: u64) -> Self {
        Self {
            strategies: vec![
                Box::new(BasinHopping::default().with_rng_seed(rng_seed)),
                Box::new(CmaEs::default().with_rng_seed(rng_seed.wrapping_add(1))),
                Box::new(DifferentialEvolution::default().with_rng_seed(rng_seed.wrapping_add(2))),
            ],
        }
    }

    /// Estimate `max_y f(y)` for `f` defined on `[0, 1]^dim`, with `seed`
    /// as the informative starting point.
    ///
    /// Every evaluation any strategy performs goes through `f`, so a caller
    /// that needs counting passes a counting closure.
    pub fn run(
        &self,
        f: &dyn Fn(&[f64]) -> f64,
        dim: usize,
        seed: &[f64],
    ) -> EvalResult<WorstCaseReport> {
        if dim == 0 {
            return Err(EvalError::DegenerateDomain);
        }
        if seed.len() != dim {
            return Err(EvalError::DimensionMismatch {
                role: "y0",
                expected: dim,
                actual: seed.len(),
            });
        }

        let negated = |y: &[f64]| -f(y);

        let mut reports = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let outcome = strategy.minimize(&negated, dim, Some(seed))?;
            debug!(
                strategy = strategy.name(),
                value = -outcome.value,
                evaluations = outcome.evaluations,
                "worst-case strategy finished"
            );
            reports.push(StrategyReport {
                strategy: strategy.name().to_string(),
                value: -outcome.value,
                evaluations: outcome.evaluations,
            });
        }

        // The constructor guarantees a non-empty ensemble.
        WorstCaseReport::from_strategies(reports).ok_or_else(|| {
            EvalError::InvalidConfig("worst-case ensemble needs at least one strategy".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bilinear_worst_case() {
        // f(y) = -0.5 * (y - 0.5): the x0 = 0 slice of the bilinear saddle,
        // maximized at y = 0 with value 0.25.
        let f = |y: &[f64]| -0.5 * (y[0] - 0.5);
        let report = WorstCaseSearch::seeded(42)
            .run(&f, 1, &[0.5])
            .expect("search runs");

        assert!((report.value - 0.25).abs() < 1e-6, "value = {}", report.value);
        assert_eq!(report.strategies.len(), 3);
        assert_eq!(
            report.evaluations,
            report.strategies.iter().map(|s| s.evaluations).sum::<u64>()
        );
    }

    #[test]
    fn test_value_is_max_over_strategies() {
        let f = |y: &[f64]| (2.0 * std::f64::consts::PI * y[0]).sin();
        let report = WorstCaseSearch::seeded(7)
            .run(&f, 1, &[0.6])
            .expect("search runs");

        let per_strategy_max = report
            .strategies
            .iter()
            .map(|s| s.value)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(report.value, per_strategy_max);
        // sin peaks at 1.0 inside the cube.
        assert!((report.value - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let f = |_: &[f64]| 0.0;
        let err = WorstCaseSearch::default().run(&f, 0, &[]).unwrap_err();
        assert!(matches!(err, EvalError::DegenerateDomain));
    }

    #[test]
    fn test_rejects_mismatched_seed() {
        let f = |_: &[f64]| 0.0;
        let err = WorstCaseSearch::default().run(&f, 2, &[0.5]).unwrap_err();
        assert!(matches!(
            err,
            EvalError::DimensionMismatch {
                role: "y0",
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_rejects_empty_ensemble() {
        let err = WorstCaseSearch::new(Vec::new()).unwrap_err();
        assert!(matches!(err, EvalError::InvalidConfig(_)));
    }

    #[test]
    fn test_counting_closure_sees_every_evaluation() {
        use std::cell::Cell;

        let count = Cell::new(0u64);
        let f = |y: &[f64]| {
            count.set(count.get() + 1);
            -(y[0] - 0.5).powi(2)
        };
        let report = WorstCaseSearch::seeded(1)
            .run(&f, 1, &[0.5])
            .expect("search runs");

        assert_eq!(count.get(), report.evaluations);
    }
}
