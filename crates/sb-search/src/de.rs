//! Differential evolution (DE/rand/1/bin).
//!
//! Population-based global search: each target vector is challenged by a
//! trial built from the scaled difference of two random population members
//! added to a third, crossed over binomially with the target.  Greedy
//! selection keeps whichever is better.
//!
//! This strategy deliberately ignores the ensemble's seed point and
//! initializes uniformly over the cube, so its result is independent of the
//! caller's initial guess.
//!
//! Reference: Storn & Price (1997), "Differential Evolution - A Simple and
//! Efficient Heuristic for Global Optimization over Continuous Spaces".

use std::cell::Cell;

use rand::prelude::*;
use sb_types::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};

use crate::strategy::{clamp_unit, make_rng, SearchStrategy, StrategyOutcome};

/// Differential-evolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifferentialEvolution {
    /// Population size; 0 selects `15 * dim` clamped to [8, 200].
    pub population_size: usize,
    /// Mutation factor F.
    pub mutation_factor: f64,
    /// Crossover rate CR.
    pub crossover_rate: f64,
    /// Generation cap.
    pub max_generations: usize,
    /// Relative convergence tolerance on population fitness spread.
    pub tol: f64,
    /// RNG seed for reproducible runs.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for DifferentialEvolution {
    fn default() -> Self {
        Self {
            population_size: 0,
            mutation_factor: 0.8,
            crossover_rate: 0.9,
            max_generations: 200,
            tol: 0.01,
            rng_seed: None,
        }
    }
}

impl DifferentialEvolution {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    fn resolve_population(&self, dim: usize) -> usize {
        if self.population_size == 0 {
            (15 * dim).clamp(8, 200)
        } else {
            self.population_size.max(4)
        }
    }

    /// Three distinct random indices, none equal to `exclude`.
    fn pick_triple(n: usize, exclude: usize, rng: &mut StdRng) -> (usize, usize, usize) {
        let mut picked = [usize::MAX; 3];
        let mut count = 0;
        while count < 3 {
            let idx = rng.random_range(0..n);
            if idx != exclude && !picked[..count].contains(&idx) {
                picked[count] = idx;
                count += 1;
            }
        }
        (picked[0], picked[1], picked[2])
    }

    /// Fitness spread small enough to call the population converged.
    fn converged(&self, fitness: &[f64]) -> bool {
        let min = fitness.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = fitness.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let mean = fitness.iter().sum::<f64>() / fitness.len() as f64;
        max - min <= 1e-12 + self.tol * mean.abs()
    }
}

impl SearchStrategy for DifferentialEvolution {
    fn minimize(
        &self,
        objective: &dyn Fn(&[f64]) -> f64,
        dim: usize,
        _seed: Option<&[f64]>,
    ) -> EvalResult<StrategyOutcome> {
        if dim == 0 {
            return Err(EvalError::DegenerateDomain);
        }

        let calls = Cell::new(0u64);
        let f = |y: &[f64]| {
            calls.set(calls.get() + 1);
            objective(y)
        };

        let mut rng = make_rng(self.rng_seed);
        let pop_size = self.resolve_population(dim);

        let mut population: Vec<Vec<f64>> = (0..pop_size)
            .map(|_| (0..dim).map(|_| rng.random::<f64>()).collect())
            .collect();
        let mut fitness: Vec<f64> = population.iter().map(|x| f(x)).collect();

        for _ in 0..self.max_generations {
            for i in 0..pop_size {
                let (a, b, c) = Self::pick_triple(pop_size, i, &mut rng);

                let j_rand = rng.random_range(0..dim);
                let mut trial: Vec<f64> = (0..dim)
                    .map(|j| {
                        if j == j_rand || rng.random::<f64>() < self.crossover_rate {
                            population[a][j]
                                + self.mutation_factor * (population[b][j] - population[c][j])
                        } else {
                            population[i][j]
                        }
                    })
                    .collect();
                clamp_unit(&mut trial);

                let trial_fitness = f(&trial);
                if trial_fitness <= fitness[i] {
                    population[i] = trial;
                    fitness[i] = trial_fitness;
                }
            }

            if self.converged(&fitness) {
                break;
            }
        }

        let best_idx = fitness
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map_or(0, |(i, _)| i);

        Ok(StrategyOutcome {
            point: population[best_idx].clone(),
            value: fitness[best_idx],
            evaluations: calls.get(),
        })
    }

    fn name(&self) -> &'static str {
        "differential_evolution"
    }
}
