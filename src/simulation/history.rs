use crate::utils::stats::OnlineMeanVariance;
use serde::{Deserialize, Serialize};

/// Metrics recorded at the end of a single turn.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnMetrics {
    /// Cumulative asset stock: +1 per win and -1 per loss so far.
    pub score: i64,
    /// One minus the total squared error between beliefs and true payoffs.
    pub knowledge: f64,
    /// Sum of squared deviations of the beliefs from their mean.
    pub opinion: f64,
    /// One minus the probability assigned to the most favoured arm.
    pub explore_probability: f64,
}

impl TurnMetrics {
    /// Measure the metrics of a turn from its post-update state.
    ///
    /// # Args
    /// * `score` - Asset stock after the turn outcome.
    /// * `beliefs` - Updated beliefs.
    /// * `payoffs` - True payoffs the turn was played with.
    /// * `choice_probabilities` - Selection probabilities used for the turn.
    pub fn measure(
        score: i64,
        beliefs: &[f64],
        payoffs: &[f64],
        choice_probabilities: &[f64],
    ) -> Self {
        let squared_error: f64 = beliefs
            .iter()
            .zip(payoffs)
            .map(|(b, p)| (b - p) * (b - p))
            .sum();
        let belief_stats: OnlineMeanVariance<f64> = beliefs.iter().copied().collect();
        let max_probability = choice_probabilities
            .iter()
            .copied()
            .fold(0.0, f64::max);
        Self {
            score,
            knowledge: 1.0 - squared_error,
            opinion: belief_stats.squared_residual_sum(),
            explore_probability: 1.0 - max_probability,
        }
    }
}

/// Per-turn time series of a simulation run.
///
/// All series have one entry per executed turn, indexed by turn number.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    score: Vec<i64>,
    knowledge: Vec<f64>,
    opinion: Vec<f64>,
    explore_probability: Vec<f64>,
}

impl History {
    pub fn with_capacity(turns: usize) -> Self {
        Self {
            score: Vec::with_capacity(turns),
            knowledge: Vec::with_capacity(turns),
            opinion: Vec::with_capacity(turns),
            explore_probability: Vec::with_capacity(turns),
        }
    }

    pub fn push(&mut self, metrics: TurnMetrics) {
        self.score.push(metrics.score);
        self.knowledge.push(metrics.knowledge);
        self.opinion.push(metrics.opinion);
        self.explore_probability.push(metrics.explore_probability);
    }

    /// Number of recorded turns.
    pub fn len(&self) -> usize {
        self.score.len()
    }

    pub fn is_empty(&self) -> bool {
        self.score.is_empty()
    }

    /// Metrics of the given turn.
    pub fn get(&self, turn: usize) -> Option<TurnMetrics> {
        Some(TurnMetrics {
            score: *self.score.get(turn)?,
            knowledge: *self.knowledge.get(turn)?,
            opinion: *self.opinion.get(turn)?,
            explore_probability: *self.explore_probability.get(turn)?,
        })
    }

    /// Metrics of the most recent turn.
    pub fn last(&self) -> Option<TurnMetrics> {
        self.len().checked_sub(1).and_then(|turn| self.get(turn))
    }

    pub fn score(&self) -> &[i64] {
        &self.score
    }

    pub fn knowledge(&self) -> &[f64] {
        &self.knowledge
    }

    pub fn opinion(&self) -> &[f64] {
        &self.opinion
    }

    pub fn explore_probability(&self) -> &[f64] {
        &self.explore_probability
    }
}
