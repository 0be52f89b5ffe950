//! Bounded Nelder-Mead simplex minimizer.
//!
//! Local refinement step for basin hopping.  Derivative-free, so it works
//! against arbitrary black-box objectives; all trial points are clamped to
//! the unit hypercube, which matches the bound handling of the population
//! strategies in this crate.

use crate::strategy::clamp_unit;

const ALPHA: f64 = 1.0; // reflection
const GAMMA: f64 = 2.0; // expansion
const RHO: f64 = 0.5; // contraction
const SIGMA: f64 = 0.5; // shrink

/// Nelder-Mead configuration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NelderMead {
    /// Maximum iterations; 0 means `200 * dim`.
    pub max_iters: usize,
    /// Convergence tolerance on simplex coordinate spread.
    pub xatol: f64,
    /// Convergence tolerance on function value spread.
    pub fatol: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iters: 0,
            xatol: 1e-6,
            fatol: 1e-8,
        }
    }
}

impl NelderMead {
    /// Minimize `f` over the unit cube starting from `x0`.
    ///
    /// Returns the best vertex and its value.
    pub(crate) fn minimize(&self, f: &dyn Fn(&[f64]) -> f64, x0: &[f64]) -> (Vec<f64>, f64) {
        let dim = x0.len();
        let max_iters = if self.max_iters == 0 {
            200 * dim
        } else {
            self.max_iters
        };

        // Initial simplex: x0 plus one vertex per axis, stepped inward when
        // the step would leave the cube.
        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
        simplex.push(x0.to_vec());
        for i in 0..dim {
            let mut v = x0.to_vec();
            v[i] = if v[i] + 0.05 <= 1.0 {
                v[i] + 0.05
            } else {
                v[i] - 0.05
            };
            clamp_unit(&mut v);
            simplex.push(v);
        }
        let mut values: Vec<f64> = simplex.iter().map(|v| f(v)).collect();

        for _ in 0..max_iters {
            // Order vertices best-to-worst.
            let mut order: Vec<usize> = (0..=dim).collect();
            order.sort_by(|&a, &b| {
                values[a]
                    .partial_cmp(&values[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let simplex_sorted: Vec<Vec<f64>> = order.iter().map(|&i| simplex[i].clone()).collect();
            let values_sorted: Vec<f64> = order.iter().map(|&i| values[i]).collect();
            simplex = simplex_sorted;
            values = values_sorted;

            if self.converged(&simplex, &values) {
                break;
            }

            // Centroid of all but the worst vertex.
            let mut centroid = vec![0.0; dim];
            for v in simplex.iter().take(dim) {
                for i in 0..dim {
                    centroid[i] += v[i] / dim as f64;
                }
            }

            let worst = simplex[dim].clone();
            let f_best = values[0];
            let f_second_worst = values[dim - 1];
            let f_worst = values[dim];

            let mut reflected: Vec<f64> = (0..dim)
                .map(|i| centroid[i] + ALPHA * (centroid[i] - worst[i]))
                .collect();
            clamp_unit(&mut reflected);
            let f_reflected = f(&reflected);

            if f_reflected < f_best {
                // Try expanding past the reflection.
                let mut expanded: Vec<f64> = (0..dim)
                    .map(|i| centroid[i] + GAMMA * (reflected[i] - centroid[i]))
                    .collect();
                clamp_unit(&mut expanded);
                let f_expanded = f(&expanded);
                if f_expanded < f_reflected {
                    simplex[dim] = expanded;
                    values[dim] = f_expanded;
                } else {
                    simplex[dim] = reflected;
                    values[dim] = f_reflected;
                }
            } else if f_reflected < f_second_worst {
                simplex[dim] = reflected;
                values[dim] = f_reflected;
            } else {
                // Contract toward the better of worst/reflected.
                let (toward, f_toward) = if f_reflected < f_worst {
                    (&reflected, f_reflected)
                } else {
                    (&worst, f_worst)
                };
                let mut contracted: Vec<f64> = (0..dim)
                    .map(|i| centroid[i] + RHO * (toward[i] - centroid[i]))
                    .collect();
                clamp_unit(&mut contracted);
                let f_contracted = f(&contracted);

                if f_contracted < f_toward {
                    simplex[dim] = contracted;
                    values[dim] = f_contracted;
                } else {
                    // Shrink everything toward the best vertex.
                    let best = simplex[0].clone();
                    for k in 1..=dim {
                        for i in 0..dim {
                            simplex[k][i] = best[i] + SIGMA * (simplex[k][i] - best[i]);
                        }
                        clamp_unit(&mut simplex[k]);
                        values[k] = f(&simplex[k]);
                    }
                }
            }
        }

        let best_idx = values
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map_or(0, |(i, _)| i);
        (simplex[best_idx].clone(), values[best_idx])
    }

    fn converged(&self, simplex: &[Vec<f64>], values: &[f64]) -> bool {
        let f_spread = values
            .iter()
            .fold(f64::NEG_INFINITY, |acc, &v| acc.max((v - values[0]).abs()));
        if f_spread > self.fatol {
            return false;
        }
        let dim = simplex[0].len();
        let x_spread = (0..dim)
            .map(|i| {
                simplex
                    .iter()
                    .fold(f64::NEG_INFINITY, |acc, v| acc.max((v[i] - simplex[0][i]).abs()))
            })
            .fold(f64::NEG_INFINITY, f64::max);
        x_spread <= self.xatol
    }
}
