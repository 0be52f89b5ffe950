//! Counted evaluation and run lifecycle.

use std::cell::Cell;

use sb_search::WorstCaseSearch;
use sb_types::{EvalError, EvalResult};

use crate::problem::SaddleProblem;

/// Wraps a [`SaddleProblem`] with per-run evaluation counting, the run
/// lifecycle, and the worst-case search engine the metrics delegate to.
///
/// The counter uses interior mutability so that counted closures handed to
/// the search strategies can borrow the evaluator immutably; every logged
/// evaluation increments it exactly once, however deep inside a strategy
/// the call originates.  Single-threaded by design: a parallel ensemble
/// would need an atomic counter instead.
pub struct SaddleEvaluator<P: SaddleProblem> {
    pub(crate) problem: P,
    pub(crate) search: WorstCaseSearch,
    run_index: u32,
    pub(crate) num_fevals: Cell<u64>,
}

impl<P: SaddleProblem> SaddleEvaluator<P> {
    /// Wrap a problem with the default worst-case ensemble.
    pub fn new(problem: P) -> Self {
        Self {
            problem,
            search: WorstCaseSearch::default(),
            run_index: 0,
            num_fevals: Cell::new(0),
        }
    }

    /// Replace the worst-case ensemble (e.g. a seeded one for
    /// reproducible runs).
    #[must_use]
    pub fn with_search(mut self, search: WorstCaseSearch) -> Self {
        self.search = search;
        self
    }

    /// The wrapped problem.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Evaluate the candidate pair through the preprocessed objective.
    ///
    /// `x` and `y` are unit-cube coordinates and must match the problem's
    /// dimensionalities; a mismatch is rejected before any evaluation
    /// happens.  When `logged` is true the per-run counter advances by
    /// one; unlogged calls (diagnostics) never touch it.
    pub fn evaluate(&self, x: &[f64], y: &[f64], logged: bool) -> EvalResult<f64> {
        self.check_dims(x, y)?;
        let value = self.problem.preprocessed_evaluate(x, y);
        if logged {
            self.count_one();
        }
        Ok(value)
    }

    /// Objective evaluations logged so far in this run.
    pub fn num_fevals(&self) -> u64 {
        self.num_fevals.get()
    }

    /// Current run index.
    pub fn run(&self) -> u32 {
        self.run_index
    }

    /// Start the next independent trial: reset the evaluation counter and
    /// advance the run index.
    ///
    /// The original implementation advanced the run index by zero, which
    /// looks unintended; see DESIGN.md for the decision to correct it.
    pub fn next_run(&mut self) {
        self.run_index += 1;
        self.num_fevals.set(0);
    }

    pub(crate) fn count_one(&self) {
        self.num_fevals.set(self.num_fevals.get() + 1);
    }

    pub(crate) fn check_dims(&self, x: &[f64], y: &[f64]) -> EvalResult<()> {
        if x.len() != self.problem.dim_x() {
            return Err(EvalError::DimensionMismatch {
                role: "x0",
                expected: self.problem.dim_x(),
                actual: x.len(),
            });
        }
        if y.len() != self.problem.dim_y() {
            return Err(EvalError::DimensionMismatch {
                role: "y0",
                expected: self.problem.dim_y(),
                actual: y.len(),
            });
        }
        Ok(())
    }
}
