//! Candidate and optimum point pairs.

use serde::{Deserialize, Serialize};

/// A paired (x, y) solution to a min-max problem.
///
/// Depending on context the coordinates are either in the unit hypercube
/// (candidates, unit-space optima) or in the problem's native domain
/// (raw optima).  The pair itself carries no unit information; the
/// problem contract decides how to interpret it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaddlePoint {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl SaddlePoint {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { x, y }
    }

    /// Whether every coordinate of both components lies in [0, 1].
    pub fn in_unit_cube(&self) -> bool {
        self.x
            .iter()
            .chain(self.y.iter())
            .all(|&v| (0.0..=1.0).contains(&v))
    }
}

/// Mean squared coordinate-wise deviation between two equal-length vectors.
pub fn mean_squared_deviation(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    if a.is_empty() {
        return 0.0;
    }
    a.iter()
        .zip(b.iter())
        .map(|(ai, bi)| (ai - bi) * (ai - bi))
        .sum::<f64>()
        / a.len() as f64
}
