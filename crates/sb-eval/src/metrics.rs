//! Robustness, loss, regret, and deviation metrics.

use sb_types::{mean_squared_deviation, EvalError, EvalResult, WorstCaseReport};
use tracing::warn;

use crate::evaluator::SaddleEvaluator;
use crate::problem::SaddleProblem;

/// Division guard for the relative metrics.
const EPS: f64 = f32::EPSILON as f64;

impl<P: SaddleProblem> SaddleEvaluator<P> {
    /// Estimate `max_y f(x0, y)` with the ensemble engine, seeded at `y0`.
    ///
    /// Every evaluation the strategies perform is logged against the
    /// per-run counter.  The report is recomputed on each call; it is
    /// only valid for the seed it was computed with.
    pub fn worst_case(&self, x0: &[f64], y0: &[f64]) -> EvalResult<WorstCaseReport> {
        self.check_dims(x0, y0)?;
        let f = |y: &[f64]| {
            self.count_one();
            self.problem.preprocessed_evaluate(x0, y)
        };
        self.search.run(&f, self.problem.dim_y(), y0)
    }

    /// Relative degradation of the objective at `x0` when the adversary is
    /// tuned against it: `(f_worst - f0) / (|f0| + eps)`.
    ///
    /// # Panics
    ///
    /// Panics if the worst-case search returns a value below `f(x0, y0)`.
    /// That is structurally impossible for a correct search (the seeded
    /// basin-hopping strategy refines `y0` itself), so a negative result is
    /// a search failure, not a valid metric.
    pub fn relative_robustness(&self, x0: &[f64], y0: &[f64]) -> EvalResult<f64> {
        self.check_dims(x0, y0)?;
        let f0 = self.evaluate(x0, y0, true)?;
        let f_worst = self.worst_case(x0, y0)?.value;

        let robustness = (f_worst - f0) / (f0.abs() + EPS);
        assert!(
            robustness >= 0.0,
            "worst-case search returned {f_worst}, below the evaluated value {f0}; \
             the worst case must upper-bound the seed point"
        );
        Ok(robustness)
    }

    /// Normalized excess of the candidate pair's value over the known
    /// saddle value: `max(0, (f0 - f_opt) / (|f_opt| + eps))`.
    ///
    /// A negative raw gap means the candidate outperforms the claimed
    /// saddle value; since `y0` is not necessarily x0's worst response this
    /// can legitimately happen, so it is surfaced as a warning and the
    /// metric clamps to zero.
    pub fn relative_loss(&self, x0: &[f64], y0: &[f64]) -> EvalResult<f64> {
        self.check_dims(x0, y0)?;
        let opt = self.problem.optimum().ok_or(EvalError::SolutionUnknown)?;

        let f0 = self.problem.preprocessed_evaluate(x0, y0);
        let f_opt = self.problem.raw_evaluate(&opt.x, &opt.y);

        let loss = (f0 - f_opt) / (f_opt.abs() + EPS);
        if loss < 0.0 {
            warn!(
                loss,
                "candidate value is below the claimed saddle value; \
                 is (x*, y*) a true min-max solution?"
            );
        }
        Ok(loss.max(0.0))
    }

    /// Gap between the worst-case response to `x0` and the known saddle
    /// value: `max(0, max_y f(x0, y) - f_opt)`.
    pub fn regret(&self, x0: &[f64], y0: &[f64]) -> EvalResult<f64> {
        self.check_dims(x0, y0)?;
        let opt = self.problem.optimum().ok_or(EvalError::SolutionUnknown)?;
        let f_opt = self.problem.raw_evaluate(&opt.x, &opt.y);

        let f_worst = self.worst_case(x0, y0)?.value;
        Ok((f_worst - f_opt).max(0.0))
    }

    /// Mean squared coordinate-wise deviation of `x0` from x* and `y0`
    /// from y*, both in unit-cube coordinates.
    pub fn mse(&self, x0: &[f64], y0: &[f64]) -> EvalResult<(f64, f64)> {
        self.check_dims(x0, y0)?;
        let unit_opt = self
            .problem
            .unit_optimum()
            .ok_or(EvalError::SolutionUnknown)?;

        Ok((
            mean_squared_deviation(x0, &unit_opt.x),
            mean_squared_deviation(y0, &unit_opt.y),
        ))
    }

    /// Copy of the known x*, in native coordinates.
    pub fn x_opt(&self) -> EvalResult<Vec<f64>> {
        self.problem
            .optimum()
            .map(|opt| opt.x)
            .ok_or(EvalError::SolutionUnknown)
    }

    /// Copy of the known y*, in native coordinates.
    pub fn y_opt(&self) -> EvalResult<Vec<f64>> {
        self.problem
            .optimum()
            .map(|opt| opt.y)
            .ok_or(EvalError::SolutionUnknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::{BilinearSaddle, ScaledBilinearSaddle};
    use sb_search::WorstCaseSearch;
    use sb_types::SaddlePoint;

    fn seeded<P: SaddleProblem>(problem: P) -> SaddleEvaluator<P> {
        SaddleEvaluator::new(problem).with_search(WorstCaseSearch::seeded(42))
    }

    /// A problem that claims an optimum value no candidate can reach,
    /// making the raw loss negative.
    struct InconsistentSaddle;

    impl SaddleProblem for InconsistentSaddle {
        fn dim_x(&self) -> usize {
            1
        }
        fn dim_y(&self) -> usize {
            1
        }
        fn raw_evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
            // Claimed optimum (0.9, 0.9) evaluates to 1.62, far above what
            // most candidates score.
            x[0] + y[0] - 0.18
        }
        fn preprocessed_evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
            self.raw_evaluate(x, y)
        }
        fn optimum(&self) -> Option<SaddlePoint> {
            Some(SaddlePoint::new(vec![0.9], vec![0.9]))
        }
        fn unit_optimum(&self) -> Option<SaddlePoint> {
            self.optimum()
        }
    }

    #[test]
    fn test_robustness_at_saddle_x_is_zero() {
        // f(0.5, y) = 0 for every y, so the worst case equals the seed
        // value and robustness vanishes.
        let eval = seeded(BilinearSaddle);
        let robustness = eval.relative_robustness(&[0.5], &[0.5]).expect("valid");
        assert!(robustness.abs() < 1e-9, "robustness = {robustness}");
    }

    #[test]
    fn test_robustness_matches_closed_form_away_from_saddle() {
        // f(0, y) = -0.5 (y - 0.5), maximized at y = 0 with value 0.25;
        // f0 = f(0, 0.5) = 0, so robustness ~= 0.25 / eps.
        let eval = seeded(BilinearSaddle);
        let robustness = eval.relative_robustness(&[0.0], &[0.5]).expect("valid");

        let expected = 0.25 / (f32::EPSILON as f64);
        assert!(
            (robustness - expected).abs() / expected < 1e-3,
            "robustness = {robustness}, expected ~{expected}"
        );
    }

    #[test]
    fn test_robustness_counts_evaluations() {
        let eval = seeded(BilinearSaddle);
        eval.relative_robustness(&[0.0], &[0.5]).expect("valid");
        // f0 plus every evaluation all three strategies performed.
        assert!(eval.num_fevals() > 1000, "fevals = {}", eval.num_fevals());
    }

    #[test]
    fn test_all_metrics_vanish_at_the_saddle_point() {
        let eval = seeded(BilinearSaddle);

        assert_eq!(eval.relative_loss(&[0.5], &[0.5]).expect("valid"), 0.0);
        let regret = eval.regret(&[0.5], &[0.5]).expect("valid");
        assert!(regret.abs() < 1e-9, "regret = {regret}");
        assert_eq!(eval.mse(&[0.5], &[0.5]).expect("valid"), (0.0, 0.0));
    }

    #[test]
    fn test_regret_away_from_saddle() {
        // Worst case for x0 = 0 is 0.25; the saddle value is 0.
        let eval = seeded(BilinearSaddle);
        let regret = eval.regret(&[0.0], &[0.5]).expect("valid");
        assert!((regret - 0.25).abs() < 1e-6, "regret = {regret}");
    }

    #[test]
    fn test_loss_is_clamped_when_candidate_beats_claimed_saddle() {
        let eval = SaddleEvaluator::new(InconsistentSaddle);
        // f(0.1, 0.1) = 0.02 < f_opt = 1.62, so the raw loss is negative.
        let loss = eval.relative_loss(&[0.1], &[0.1]).expect("valid");
        assert_eq!(loss, 0.0);
    }

    #[test]
    fn test_mse_arithmetic() {
        let eval = SaddleEvaluator::new(BilinearSaddle);
        let (mse_x, mse_y) = eval.mse(&[0.0], &[1.0]).expect("valid");
        assert!((mse_x - 0.25).abs() < 1e-12);
        assert!((mse_y - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_optimum_relative_metrics_fail_without_solution() {
        struct Unknown;
        impl SaddleProblem for Unknown {
            fn dim_x(&self) -> usize {
                1
            }
            fn dim_y(&self) -> usize {
                1
            }
            fn raw_evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
                x[0] * y[0]
            }
            fn preprocessed_evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
                self.raw_evaluate(x, y)
            }
        }

        let eval = SaddleEvaluator::new(Unknown);
        assert!(matches!(eval.x_opt(), Err(EvalError::SolutionUnknown)));
        assert!(matches!(eval.y_opt(), Err(EvalError::SolutionUnknown)));
        assert!(matches!(
            eval.relative_loss(&[0.5], &[0.5]),
            Err(EvalError::SolutionUnknown)
        ));
        assert!(matches!(
            eval.regret(&[0.5], &[0.5]),
            Err(EvalError::SolutionUnknown)
        ));
        assert!(matches!(
            eval.mse(&[0.5], &[0.5]),
            Err(EvalError::SolutionUnknown)
        ));
    }

    #[test]
    fn test_optimum_accessors_return_defensive_copies() {
        let eval = SaddleEvaluator::new(BilinearSaddle);
        let mut copy = eval.x_opt().expect("known optimum");
        copy[0] = 123.0;
        assert_eq!(eval.x_opt().expect("known optimum"), vec![0.5]);
        assert_eq!(eval.y_opt().expect("known optimum"), vec![0.5]);
    }

    #[test]
    fn test_dimension_mismatch_rejected_across_metrics() {
        let eval = SaddleEvaluator::new(BilinearSaddle);
        let bad = [0.1, 0.2];

        assert!(matches!(
            eval.relative_robustness(&bad, &[0.5]),
            Err(EvalError::DimensionMismatch { role: "x0", .. })
        ));
        assert!(matches!(
            eval.relative_loss(&[0.5], &bad),
            Err(EvalError::DimensionMismatch { role: "y0", .. })
        ));
        assert!(matches!(
            eval.regret(&bad, &[0.5]),
            Err(EvalError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            eval.mse(&bad, &[0.5]),
            Err(EvalError::DimensionMismatch { .. })
        ));
        assert_eq!(eval.num_fevals(), 0);
    }

    #[test]
    fn test_worst_case_on_scaled_domain() {
        // Native f(u, v) = u * v on [-1, 1]^2; for unit x0 = 0.25
        // (native u = -0.5) the adversary minimizes v, giving 0.5 at
        // native v = -1 (unit y = 0).
        let eval = seeded(ScaledBilinearSaddle);
        let report = eval.worst_case(&[0.25], &[0.5]).expect("valid");
        assert!((report.value - 0.5).abs() < 1e-6, "value = {}", report.value);
    }

    #[test]
    fn test_scaled_metrics_vanish_at_saddle() {
        let eval = seeded(ScaledBilinearSaddle);
        // Unit (0.5, 0.5) maps to native (0, 0), the saddle.
        assert_eq!(eval.relative_loss(&[0.5], &[0.5]).expect("valid"), 0.0);
        assert_eq!(eval.mse(&[0.5], &[0.5]).expect("valid"), (0.0, 0.0));
        assert_eq!(eval.x_opt().expect("known optimum"), vec![0.0]);
    }
}
