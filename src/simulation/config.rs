use super::Bandit;
use crate::error::SimulationError;
use crate::payoffs::BetaPayoffs;
use crate::policies::{LaplaceBelief, RandomShock, Softmax};
use crate::Prng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Configuration of a [`Bandit`] simulation.
///
/// The defaults reproduce the baseline setting of Posen & Levinthal (2012):
/// 10 arms, 500 turns, no turbulence and a softmax temperature of 0.5.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BanditConfig {
    /// Number of arms.
    pub arm_count: usize,
    /// Number of turns to simulate.
    pub turn_count: usize,
    /// Turbulence intensity passed to the turbulence policy each turn.
    pub turbulence_intensity: f64,
    /// Strategy parameter passed to the strategy each turn; the softmax temperature by default.
    pub strategy_parameter: f64,
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            arm_count: 10,
            turn_count: 500,
            turbulence_intensity: 0.0,
            strategy_parameter: 0.5,
        }
    }
}

impl BanditConfig {
    pub const fn new(arm_count: usize, turn_count: usize) -> Self {
        Self {
            arm_count,
            turn_count,
            turbulence_intensity: 0.0,
            strategy_parameter: 0.5,
        }
    }

    pub fn with_turbulence(mut self, turbulence_intensity: f64) -> Self {
        self.turbulence_intensity = turbulence_intensity;
        self
    }

    pub fn with_strategy_parameter(mut self, strategy_parameter: f64) -> Self {
        self.strategy_parameter = strategy_parameter;
        self
    }

    /// Check the policy-independent parts of the configuration.
    ///
    /// # Errors
    /// If there are no arms or either scalar parameter is not finite.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.arm_count == 0 {
            return Err(SimulationError::InvalidConfig(
                "arm_count must be positive".into(),
            ));
        }
        if !self.turbulence_intensity.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "turbulence_intensity must be finite, got {}",
                self.turbulence_intensity
            )));
        }
        if !self.strategy_parameter.is_finite() {
            return Err(SimulationError::InvalidConfig(format!(
                "strategy_parameter must be finite, got {}",
                self.strategy_parameter
            )));
        }
        Ok(())
    }

    /// Build a simulation with the default policies.
    ///
    /// Payoffs are drawn from `Beta(2, 2)`, turbulence is [`RandomShock`], choice is
    /// [`Softmax`] and beliefs follow [`LaplaceBelief`].
    ///
    /// # Args
    /// * `seed` - Seed for all randomness of the run.
    ///
    /// # Errors
    /// If the configuration is invalid.
    pub fn build(&self, seed: u64) -> Result<Bandit, SimulationError> {
        self.build_with_rng(Prng::seed_from_u64(seed))
    }

    /// Build a simulation with the default policies, drawing randomness from `rng`.
    ///
    /// # Errors
    /// If the configuration is invalid.
    pub fn build_with_rng<R: Rng>(
        &self,
        rng: R,
    ) -> Result<Bandit<BetaPayoffs, RandomShock, Softmax, LaplaceBelief, R>, SimulationError> {
        Bandit::new(
            *self,
            BetaPayoffs::default(),
            RandomShock::new(),
            Softmax,
            LaplaceBelief,
            rng,
        )
    }
}
