//! # sb-search
//!
//! Worst-case response search for SaddleBench.
//!
//! Given a fixed minimizer candidate `x0`, the adversarial value
//! `max_y f(x0, y)` over the unit hypercube is estimated by running an
//! ensemble of heterogeneous global-search strategies and taking the best
//! (most adversarial) result.  No single global optimizer can be trusted on
//! an arbitrary landscape; heterogeneous strategies are unlikely to share
//! the same blind spot.
//!
//! The default ensemble, run strictly sequentially:
//!
//! 1. [`BasinHopping`] — seeded stochastic perturbation + bounded local
//!    refinement with Metropolis acceptance.
//! 2. [`CmaEs`] — covariance matrix adaptation with IPOP restarts, capped
//!    at a fixed evaluation budget.
//! 3. [`DifferentialEvolution`] — unseeded population search, exploring
//!    independently of the initial guess to reduce seed bias.
//!
//! Strategies share the [`SearchStrategy`] trait: (bounded objective, seed)
//! to (best point, best value, evaluations spent).  The ensemble composes
//! them by a max reduction, so adding or removing a strategy never touches
//! the metric layer.

mod basin_hopping;
mod cmaes;
mod de;
mod ensemble;
mod nelder_mead;
mod strategy;

pub use basin_hopping::BasinHopping;
pub use cmaes::CmaEs;
pub use de::DifferentialEvolution;
pub use ensemble::WorstCaseSearch;
pub use strategy::{SearchStrategy, StrategyOutcome};
