use super::TurnMetrics;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Final metrics of a completed simulation run.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub turns: usize,
    pub metrics: TurnMetrics,
    pub elapsed: Duration,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let precision = f.precision().unwrap_or(4);
        writeln!(f, "turns:               {}", self.turns)?;
        writeln!(f, "final asset stock:   {}", self.metrics.score)?;
        writeln!(
            f,
            "knowledge:           {:.*}",
            precision, self.metrics.knowledge
        )?;
        writeln!(f, "opinion:             {:.*}", precision, self.metrics.opinion)?;
        writeln!(
            f,
            "explore probability: {:.*}",
            precision, self.metrics.explore_probability
        )?;
        writeln!(f, "simulation time:     {:?}", self.elapsed)?;
        Ok(())
    }
}
