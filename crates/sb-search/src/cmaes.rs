//! CMA-ES: covariance matrix adaptation evolution strategy.
//!
//! Derivative-free population search adapting a (diagonal) covariance
//! matrix and step size from the ranked samples of each generation.
//! Supports IPOP restarts: on stagnation the population doubles and the
//! search resumes from a random point, which helps escape local optima on
//! multimodal landscapes.  The whole run is capped at a fixed evaluation
//! budget so the ensemble's cost stays bounded.
//!
//! Reference: Hansen (2016), "The CMA Evolution Strategy: A Tutorial".

use std::cell::Cell;
use std::f64::consts::PI;

use rand::prelude::*;
use sb_types::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};

use crate::strategy::{clamp_unit, make_rng, SearchStrategy, StrategyOutcome};

/// CMA-ES configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmaEs {
    /// Hard cap on objective evaluations across all restarts.
    pub max_evaluations: u64,
    /// Initial step size; a third of the unit range by default.
    pub initial_sigma: f64,
    /// Enable IPOP restarts with doubled population on stagnation.
    pub restart: bool,
    /// Maximum number of restarts.
    pub max_restarts: usize,
    /// Generations without improvement before a restart triggers.
    pub stagnation_gens: usize,
    /// RNG seed for reproducible runs.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for CmaEs {
    fn default() -> Self {
        Self {
            max_evaluations: 1000,
            initial_sigma: 0.3,
            restart: true,
            max_restarts: 9,
            stagnation_gens: 20,
            rng_seed: None,
        }
    }
}

impl CmaEs {
    #[must_use]
    pub fn new(max_evaluations: u64) -> Self {
        Self {
            max_evaluations,
            ..Self::default()
        }
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    fn default_lambda(dim: usize) -> usize {
        (4 + (3.0 * (dim as f64).ln()).floor() as usize).max(4)
    }
}

/// Per-restart mutable state: distribution parameters and evolution paths.
struct CmaState {
    dim: usize,
    lambda: usize,
    mu: usize,
    weights: Vec<f64>,
    mu_eff: f64,
    c_sigma: f64,
    c_c: f64,
    c_1: f64,
    c_mu: f64,
    d_sigma: f64,
    sigma: f64,
    mean: Vec<f64>,
    p_sigma: Vec<f64>,
    p_c: Vec<f64>,
    c_diag: Vec<f64>,
}

impl CmaState {
    fn new(dim: usize, lambda: usize, mean: Vec<f64>, sigma: f64) -> Self {
        let mu = lambda / 2;
        let weights: Vec<f64> = (0..mu)
            .map(|i| ((mu as f64 + 0.5).ln() - ((i + 1) as f64).ln()).max(0.0))
            .collect();
        let sum_w: f64 = weights.iter().sum();
        let weights: Vec<f64> = weights.iter().map(|w| w / sum_w).collect();
        let mu_eff = 1.0 / weights.iter().map(|w| w * w).sum::<f64>();

        let n = dim as f64;
        let c_sigma = (mu_eff + 2.0) / (n + mu_eff + 5.0);
        let c_c = (4.0 + mu_eff / n) / (n + 4.0 + 2.0 * mu_eff / n);
        let c_1 = 2.0 / ((n + 1.3).powi(2) + mu_eff);
        let c_mu =
            ((2.0 * (mu_eff - 2.0 + 1.0 / mu_eff)) / ((n + 2.0).powi(2) + mu_eff)).min(1.0 - c_1);
        let d_sigma = 1.0 + 2.0 * (0.0_f64).max((mu_eff - 1.0) / (n + 1.0)).sqrt() + c_sigma;

        Self {
            dim,
            lambda,
            mu,
            weights,
            mu_eff,
            c_sigma,
            c_c,
            c_1,
            c_mu,
            d_sigma,
            sigma,
            mean,
            p_sigma: vec![0.0; dim],
            p_c: vec![0.0; dim],
            c_diag: vec![1.0; dim],
        }
    }

    /// Standard normal draw via Box-Muller.
    fn randn(rng: &mut StdRng) -> f64 {
        let u1: f64 = rng.random::<f64>().max(1e-12);
        let u2: f64 = rng.random();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    fn sample(&self, rng: &mut StdRng) -> Vec<f64> {
        let mut x: Vec<f64> = (0..self.dim)
            .map(|i| self.mean[i] + self.sigma * self.c_diag[i].sqrt() * Self::randn(rng))
            .collect();
        clamp_unit(&mut x);
        x
    }

    /// Distribution update from one generation of ranked samples.
    ///
    /// `ranked` pairs (sample, value) sorted ascending by value; `gen` is
    /// the zero-based generation index within this restart.
    fn update(&mut self, ranked: &[(Vec<f64>, f64)], gen: usize) {
        let n = self.dim as f64;
        let chi_n = n.sqrt() * (1.0 - 1.0 / (4.0 * n) + 1.0 / (21.0 * n * n));

        let old_mean = self.mean.clone();
        self.mean = vec![0.0; self.dim];
        for (rank, (x, _)) in ranked.iter().take(self.mu).enumerate() {
            for i in 0..self.dim {
                self.mean[i] += self.weights[rank] * x[i];
            }
        }

        let mean_diff: Vec<f64> = (0..self.dim)
            .map(|i| (self.mean[i] - old_mean[i]) / self.sigma)
            .collect();

        // Evolution path for sigma (diagonal approximation of C^(-1/2)).
        for i in 0..self.dim {
            self.p_sigma[i] = (1.0 - self.c_sigma) * self.p_sigma[i]
                + (self.c_sigma * (2.0 - self.c_sigma) * self.mu_eff).sqrt() * mean_diff[i]
                    / self.c_diag[i].sqrt();
        }
        let p_sigma_norm: f64 = self.p_sigma.iter().map(|p| p * p).sum::<f64>().sqrt();

        let h_sigma = if p_sigma_norm
            / (1.0 - (1.0 - self.c_sigma).powi(2 * (gen as i32 + 1))).sqrt()
            < (1.4 + 2.0 / (n + 1.0)) * chi_n
        {
            1.0
        } else {
            0.0
        };

        for i in 0..self.dim {
            self.p_c[i] = (1.0 - self.c_c) * self.p_c[i]
                + h_sigma * (self.c_c * (2.0 - self.c_c) * self.mu_eff).sqrt() * mean_diff[i];
        }

        // Rank-one + rank-mu covariance update, diagonal only.
        for i in 0..self.dim {
            let rank_one = self.p_c[i] * self.p_c[i];
            let mut rank_mu = 0.0;
            for (rank, (x, _)) in ranked.iter().take(self.mu).enumerate() {
                let y_i = (x[i] - old_mean[i]) / self.sigma;
                rank_mu += self.weights[rank] * y_i * y_i;
            }
            self.c_diag[i] = ((1.0 - self.c_1 - self.c_mu) * self.c_diag[i]
                + self.c_1 * rank_one
                + self.c_mu * rank_mu)
                .max(1e-20);
        }

        self.sigma *= ((self.c_sigma / self.d_sigma) * (p_sigma_norm / chi_n - 1.0)).exp();
        self.sigma = self.sigma.clamp(1e-20, 1e10);
    }
}

impl SearchStrategy for CmaEs {
    fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        dim: usize,
        seed: Option<&[f64]>,
    ) -> EvalResult<StrategyOutcome> {
        if dim == 0 {
            return Err(EvalError::DegenerateDomain);
        }
        if let Some(s) = seed {
            if s.len() != dim {
                return Err(EvalError::InvalidConfig(format!(
                    "CMA-ES seed has length {}, domain has dimension {dim}",
                    s.len()
                )));
            }
        }

        let calls = Cell::new(0u64);
        let f = |y: &[f64]| {
            calls.set(calls.get() + 1);
            objective(y)
        };

        let mut rng = make_rng(self.rng_seed);
        let initial_mean = seed.map_or_else(|| vec![0.5; dim], <[f64]>::to_vec);

        let mut lambda = Self::default_lambda(dim);
        let mut state = CmaState::new(dim, lambda, initial_mean, self.initial_sigma);

        let mut best: Vec<f64> = state.mean.clone();
        let mut f_best = f(&best);

        let mut restarts = 0usize;
        let mut gen = 0usize;
        let mut gens_without_improvement = 0usize;

        while calls.get() + state.lambda as u64 <= self.max_evaluations {
            let mut ranked: Vec<(Vec<f64>, f64)> = (0..state.lambda)
                .map(|_| {
                    let x = state.sample(&mut rng);
                    let v = f(&x);
                    (x, v)
                })
                .collect();
            ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

            if ranked[0].1 < f_best - 1e-12 {
                f_best = ranked[0].1;
                best.clone_from(&ranked[0].0);
                gens_without_improvement = 0;
            } else {
                gens_without_improvement += 1;
            }

            let stagnated =
                state.sigma < 1e-12 || gens_without_improvement >= self.stagnation_gens;
            if self.restart && stagnated && restarts < self.max_restarts {
                restarts += 1;
                lambda *= 2;
                let mean: Vec<f64> = (0..dim).map(|_| rng.random::<f64>()).collect();
                state = CmaState::new(dim, lambda, mean, self.initial_sigma);
                gen = 0;
                gens_without_improvement = 0;
                continue;
            }

            state.update(&ranked, gen);
            gen += 1;
        }

        Ok(StrategyOutcome {
            point: best,
            value: f_best,
            evaluations: calls.get(),
        })
    }

    fn name(&self) -> &'static str {
        "cmaes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converges_on_quadratic() {
        let f = |x: &[f64]| (x[0] - 0.25).powi(2) + (x[1] - 0.75).powi(2);
        let out = CmaEs::default()
            .with_rng_seed(42)
            .minimize(&f, 2, Some(&[0.5, 0.5]))
            .expect("search runs");

        assert!(out.value < 1e-4, "value = {}", out.value);
        assert!((out.point[0] - 0.25).abs() < 1e-2);
        assert!((out.point[1] - 0.75).abs() < 1e-2);
    }

    #[test]
    fn test_respects_evaluation_budget() {
        let f = |x: &[f64]| x[0] * x[0];
        let cma = CmaEs::new(200).with_rng_seed(1);
        let out = cma.minimize(&f, 3, None).expect("search runs");

        assert!(out.evaluations <= 200, "spent {}", out.evaluations);
    }

    #[test]
    fn test_boundary_minimum() {
        // Minimum of a linear slope sits on the cube boundary.
        let f = |x: &[f64]| x[0];
        let out = CmaEs::default()
            .with_rng_seed(3)
            .minimize(&f, 1, Some(&[0.9]))
            .expect("search runs");

        assert!(out.point[0] < 0.05, "point = {:?}", out.point);
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let f = |_: &[f64]| 0.0;
        let err = CmaEs::default().minimize(&f, 0, None).unwrap_err();
        assert!(matches!(err, EvalError::DegenerateDomain));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let f = |x: &[f64]| (x[0] - 0.4).powi(2) + (10.0 * x[0]).sin() * 0.05;
        let a = CmaEs::default()
            .with_rng_seed(9)
            .minimize(&f, 1, Some(&[0.5]))
            .expect("search runs");
        let b = CmaEs::default()
            .with_rng_seed(9)
            .minimize(&f, 1, Some(&[0.5]))
            .expect("search runs");

        assert_eq!(a.value, b.value);
        assert_eq!(a.evaluations, b.evaluations);
    }
}
