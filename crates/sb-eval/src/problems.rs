//! Reference problems with known saddle points.
//!
//! Real objectives live in downstream crates; these fixtures exist so the
//! harness can be exercised against closed-form solutions.

use sb_types::SaddlePoint;

use crate::problem::SaddleProblem;

/// `f(x, y) = (x - 0.5)(y - 0.5)` on the unit square.
///
/// The saddle point is (0.5, 0.5) with value 0: along `x = 0.5` the
/// objective is identically zero, and for any fixed `x` the adversary's
/// best response sits on a boundary.  Native domain and unit cube
/// coincide, so preprocessing is the identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct BilinearSaddle;

impl SaddleProblem for BilinearSaddle {
    fn dim_x(&self) -> usize {
        1
    }

    fn dim_y(&self) -> usize {
        1
    }

    fn raw_evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
        (x[0] - 0.5) * (y[0] - 0.5)
    }

    fn preprocessed_evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
        self.raw_evaluate(x, y)
    }

    fn optimum(&self) -> Option<SaddlePoint> {
        Some(SaddlePoint::new(vec![0.5], vec![0.5]))
    }

    fn unit_optimum(&self) -> Option<SaddlePoint> {
        self.optimum()
    }
}

/// `f(u, v) = u * v` on the native domain `[-1, 1]^2`.
///
/// Exercises a non-trivial unit-cube-to-native transform
/// (`t -> 2t - 1` per coordinate) and therefore the distinction between
/// the raw and preprocessed evaluation paths.  The saddle sits at native
/// (0, 0), i.e. unit (0.5, 0.5), with value 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaledBilinearSaddle;

impl ScaledBilinearSaddle {
    fn to_native(t: f64) -> f64 {
        2.0 * t - 1.0
    }
}

impl SaddleProblem for ScaledBilinearSaddle {
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
        let native_x: Vec<f64> = x.iter().map(|&t| Self::to_native(t)).collect();
        let native_y: Vec<f64> = y.iter().map(|&t| Self::to_native(t)).collect();
        self.raw_evaluate(&native_x, &native_y)
    }

    fn optimum(&self) -> Option<SaddlePoint> {
        Some(SaddlePoint::new(vec![0.0], vec![0.0]))
    }

    fn unit_optimum(&self) -> Option<SaddlePoint> {
        Some(SaddlePoint::new(vec![0.5], vec![0.5]))
    }
}
