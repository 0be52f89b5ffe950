//! Basin hopping: stochastic global search via perturbation + local
//! refinement with Metropolis acceptance.
//!
//! Each outer iteration perturbs the current basin's representative point,
//! refines the perturbed point with a bounded Nelder-Mead minimizer, and
//! accepts or rejects the new basin by the Metropolis criterion.  The seed
//! point is refined first, so the reported best is never worse than the
//! seed's own local minimum.

use std::cell::Cell;

use rand::prelude::*;
use sb_types::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};

use crate::nelder_mead::NelderMead;
use crate::strategy::{clamp_unit, make_rng, SearchStrategy, StrategyOutcome};

/// Basin-hopping configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasinHopping {
    /// Number of perturbation + refinement cycles.
    pub iterations: usize,
    /// Metropolis temperature.
    pub temperature: f64,
    /// Maximum per-coordinate perturbation magnitude.
    pub step_size: f64,
    /// RNG seed for reproducible runs.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for BasinHopping {
    fn default() -> Self {
        Self {
            iterations: 100,
            temperature: 1.0,
            step_size: 0.5,
            rng_seed: None,
        }
    }
}

impl BasinHopping {
    #[must_use]
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    fn accept(&self, delta: f64, rng: &mut StdRng) -> bool {
        if delta <= 0.0 {
            return true;
        }
        if self.temperature <= 0.0 {
            return false;
        }
        rng.random::<f64>() < (-delta / self.temperature).exp()
    }
}

impl SearchStrategy for BasinHopping {
    fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        dim: usize,
        seed: Option<&[f64]>,
    ) -> EvalResult<StrategyOutcome> {
        if dim == 0 {
            return Err(EvalError::DegenerateDomain);
        }
        let start: Vec<f64> = match seed {
            Some(s) if s.len() == dim => s.to_vec(),
            Some(s) => {
                return Err(EvalError::InvalidConfig(format!(
                    "basin hopping seed has length {}, domain has dimension {dim}",
                    s.len()
                )))
            }
            None => vec![0.5; dim],
        };

        let calls = Cell::new(0u64);
        let f = |y: &[f64]| {
            calls.set(calls.get() + 1);
            objective(y)
        };

        let mut rng = make_rng(self.rng_seed);
        let local = NelderMead::default();

        let (mut current, mut f_current) = local.minimize(&f, &start);
        let mut best = current.clone();
        let mut f_best = f_current;

        for _ in 0..self.iterations {
            let mut candidate: Vec<f64> = current
                .iter()
                .map(|&v| v + rng.random_range(-self.step_size..=self.step_size))
                .collect();
            clamp_unit(&mut candidate);

            let (refined, f_refined) = local.minimize(&f, &candidate);

            if f_refined < f_best {
                best = refined.clone();
                f_best = f_refined;
            }
            if self.accept(f_refined - f_current, &mut rng) {
                current = refined;
                f_current = f_refined;
            }
        }

        Ok(StrategyOutcome {
            point: best,
            value: f_best,
            evaluations: calls.get(),
        })
    }

    fn name(&self) -> &'static str {
        "basin_hopping"
    }
}
