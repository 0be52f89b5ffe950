//! The problem contract: what a concrete min-max problem must provide.

use sb_types::SaddlePoint;

/// A bounded min-max problem `min_x max_y f(x, y)`.
///
/// Candidates always live in the unit hypercube; the implementation is
/// responsible for mapping unit-cube coordinates into whatever native
/// domain the actual objective requires.  The two evaluators therefore
/// differ in the space they accept:
///
/// - [`raw_evaluate`](SaddleProblem::raw_evaluate) takes native-space
///   coordinates and is used only for optimum-relative metrics, where the
///   known saddle point is expressed natively.
/// - [`preprocessed_evaluate`](SaddleProblem::preprocessed_evaluate) takes
///   unit-cube coordinates, remaps them, and calls the raw objective.  All
///   counted evaluations go through this path.
///
/// A problem without a known saddle point leaves both optimum accessors at
/// their `None` default; any metric that needs the optimum then fails with
/// a solution-unknown error instead of inventing a value.
pub trait SaddleProblem {
    /// Dimensionality of the minimizer domain.  Positive, fixed.
    fn dim_x(&self) -> usize;

    /// Dimensionality of the adversary domain.  Positive, fixed.
    fn dim_y(&self) -> usize;

    /// Evaluate the objective at native-space coordinates.
    fn raw_evaluate(&self, x: &[f64], y: &[f64]) -> f64;

    /// Evaluate the objective at unit-cube coordinates, remapping into the
    /// native domain first.
    fn preprocessed_evaluate(&self, x: &[f64], y: &[f64]) -> f64;

    /// The known saddle point in native coordinates, if any.
    fn optimum(&self) -> Option<SaddlePoint> {
        None
    }

    /// The known saddle point in unit-cube coordinates, if any.
    ///
    /// Must be `Some` exactly when [`optimum`](SaddleProblem::optimum) is.
    fn unit_optimum(&self) -> Option<SaddlePoint> {
        None
    }
}
