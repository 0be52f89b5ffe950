//! # sb-eval
//!
//! Evaluation harness for candidate solutions to bounded min-max
//! ("saddle point") problems.
//!
//! A concrete problem implements [`SaddleProblem`]: a raw objective in its
//! native domain plus a preprocessed evaluator that maps unit-cube
//! coordinates into that domain.  [`SaddleEvaluator`] wraps the problem
//! with per-run evaluation counting and derives the quality metrics:
//!
//! - `relative_robustness` — degradation of x0 under an adversarially
//!   tuned y, found by the worst-case ensemble search.
//! - `relative_loss` — normalized gap between the candidate pair's value
//!   and the known saddle value.
//! - `regret` — absolute gap between the worst-case response to x0 and the
//!   known saddle value.
//! - `mse` — mean squared deviation of (x0, y0) from the unit-cube optimum.
//!
//! Metrics that reference the optimum fail with
//! [`EvalError::SolutionUnknown`](sb_types::EvalError) when the problem
//! declares none.

pub mod evaluator;
pub mod metrics;
pub mod problem;
pub mod problems;

pub use evaluator::SaddleEvaluator;
pub use problem::SaddleProblem;
pub use problems::{BilinearSaddle, ScaledBilinearSaddle};
