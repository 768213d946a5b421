//! Belief update policies
use serde::{Deserialize, Serialize};

/// Updates the gambler's beliefs about arm payoffs from observed outcomes.
pub trait BeliefUpdate {
    /// Update `beliefs` in place given the cumulative try and win counts of each arm.
    fn update(&self, beliefs: &mut [f64], tries: &[u64], wins: &[u64]);
}

/// Laplace-smoothed empirical win rate.
///
/// `belief = (wins + 1) / (tries + 2)`, as if each arm started with two virtual tries and one
/// virtual win. The initial belief is 0.5 and a single observation never moves a belief
/// straight to 0 or 1.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaplaceBelief;

impl LaplaceBelief {
    #[allow(clippy::cast_precision_loss)]
    #[inline]
    pub fn estimate(tries: u64, wins: u64) -> f64 {
        (wins + 1) as f64 / (tries + 2) as f64
    }
}

impl BeliefUpdate for LaplaceBelief {
    fn update(&self, beliefs: &mut [f64], tries: &[u64], wins: &[u64]) {
        for ((belief, &t), &w) in beliefs.iter_mut().zip(tries).zip(wins) {
            *belief = Self::estimate(t, w);
        }
    }
}
