//! Arm selection strategies
use crate::error::PolicyError;
use serde::{Deserialize, Serialize};

/// Maps gambler beliefs to a probability distribution over arms.
pub trait Strategy {
    /// Arm selection probabilities given the current beliefs.
    ///
    /// # Args
    /// * `beliefs` - Believed payoff of each arm.
    /// * `parameter` - Strategy parameter. The meaning is strategy-specific.
    ///
    /// # Returns
    /// One non-negative probability per arm, summing to 1.
    ///
    /// # Errors
    /// If `parameter` is not valid for this strategy.
    fn choice_probabilities(&self, beliefs: &[f64], parameter: f64)
        -> Result<Vec<f64>, PolicyError>;
}

/// Softmax (Boltzmann) selection with temperature `tau = parameter`.
///
/// `p[a] = exp(beliefs[a] / tau) / sum_b exp(beliefs[b] / tau)`.
/// Small temperatures approach greedy exploitation of the highest belief and
/// large temperatures approach uniform random exploration.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Softmax;

impl Strategy for Softmax {
    fn choice_probabilities(&self, beliefs: &[f64], tau: f64) -> Result<Vec<f64>, PolicyError> {
        if !(tau > 0.0 && tau.is_finite()) {
            return Err(PolicyError::InvalidParameter {
                name: "softmax temperature",
                value: tau,
                range: "(0, inf)",
            });
        }
        // Shifting by the max leaves the distribution unchanged and avoids overflow at low tau.
        let max_belief = beliefs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut weights: Vec<f64> = beliefs
            .iter()
            .map(|b| ((b - max_belief) / tau).exp())
            .collect();
        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w /= total;
        }
        Ok(weights)
    }
}

/// Epsilon-greedy selection with exploration rate `epsilon = parameter`.
///
/// Probability `1 - epsilon` is shared equally among the arms with the highest belief and
/// probability `epsilon` is spread uniformly over all arms.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpsilonGreedy;

impl Strategy for EpsilonGreedy {
    #[allow(clippy::cast_precision_loss)]
    fn choice_probabilities(
        &self,
        beliefs: &[f64],
        epsilon: f64,
    ) -> Result<Vec<f64>, PolicyError> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(PolicyError::InvalidParameter {
                name: "exploration rate",
                value: epsilon,
                range: "[0, 1]",
            });
        }
        let max_belief = beliefs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let num_best = beliefs.iter().filter(|&&b| b == max_belief).count();
        let explore = epsilon / beliefs.len() as f64;
        let exploit = (1.0 - epsilon) / num_best as f64;
        Ok(beliefs
            .iter()
            .map(|&b| if b == max_belief { explore + exploit } else { explore })
            .collect())
    }
}

/// Sample an index from a discrete distribution by inverting its cumulative distribution.
///
/// Selects the first index with non-zero probability whose cumulative probability is
/// greater than or equal to `u`. For `u` uniform on `[0, 1)` this samples index `i` with
/// probability `probabilities[i]`.
///
/// Returns `None` if no index has positive probability.
pub fn sample_index(probabilities: &[f64], u: f64) -> Option<usize> {
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (i, &p) in probabilities.iter().enumerate() {
        if p <= 0.0 {
            continue;
        }
        cumulative += p;
        last_positive = Some(i);
        if cumulative >= u {
            return last_positive;
        }
    }
    // Rounding can leave the total slightly below u
    last_positive
}
