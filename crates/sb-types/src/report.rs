//! Worst-case search reports.

use serde::{Deserialize, Serialize};

/// Best result one search strategy produced, with the budget it spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    /// Strategy name (e.g. "basin_hopping", "cmaes", "differential_evolution").
    pub strategy: String,
    /// Best adversarial objective value found (original sign convention,
    /// i.e. already un-negated back to a maximization value).
    pub value: f64,
    /// Objective evaluations this strategy consumed.
    pub evaluations: u64,
}

/// Aggregate result of the worst-case ensemble search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorstCaseReport {
    /// Max over all strategy values: the worst-case estimate of
    /// `max_y f(x0, y)`.
    pub value: f64,
    /// Total evaluations across all strategies.
    pub evaluations: u64,
    /// Per-strategy breakdown, in execution order.
    pub strategies: Vec<StrategyReport>,
}

impl WorstCaseReport {
    /// Build a report from per-strategy results, reducing by max.
    ///
    /// Returns `None` if `strategies` is empty (an ensemble with no
    /// members has no defined worst case).
    pub fn from_strategies(strategies: Vec<StrategyReport>) -> Option<Self> {
        if strategies.is_empty() {
            return None;
        }
        let value = strategies
            .iter()
            .map(|s| s.value)
            .fold(f64::NEG_INFINITY, f64::max);
        let evaluations = strategies.iter().map(|s| s.evaluations).sum();
        Some(Self {
            value,
            evaluations,
            strategies,
        })
    }
}
