//! Payoff turbulence policies
use crate::error::PolicyError;
use crate::payoffs::PayoffGenerator;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Environmental turbulence: mutates true arm payoffs at the start of each turn.
pub trait Turbulence {
    /// Possibly redraw some of the arm payoffs.
    ///
    /// # Args
    /// * `payoffs` - True arm payoffs. Modified in place.
    /// * `generator` - Source of replacement payoffs.
    /// * `intensity` - Turbulence intensity. The meaning is policy-specific.
    /// * `rng` - Random number generator.
    ///
    /// # Errors
    /// If `intensity` is not valid for this policy.
    fn perturb<G, R>(
        &self,
        payoffs: &mut [f64],
        generator: &mut G,
        intensity: f64,
        rng: &mut R,
    ) -> Result<(), PolicyError>
    where
        G: PayoffGenerator + ?Sized,
        R: Rng + ?Sized;
}

/// Turbulence that never changes the payoffs.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoTurbulence;

impl Turbulence for NoTurbulence {
    fn perturb<G, R>(&self, _: &mut [f64], _: &mut G, _: f64, _: &mut R) -> Result<(), PolicyError>
    where
        G: PayoffGenerator + ?Sized,
        R: Rng + ?Sized,
    {
        Ok(())
    }
}

/// Random payoff shocks.
///
/// Each turn, a shock occurs with probability `intensity`.
/// When it does, each arm independently has its payoff redrawn from the generator with
/// probability `arm_probability`, or with probability `intensity` if that is `None`.
///
/// An intensity of zero consumes no randomness and leaves the payoffs unchanged.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomShock {
    /// Per-arm redraw probability during a shock. Defaults to the turbulence intensity.
    pub arm_probability: Option<f64>,
}

impl RandomShock {
    pub const fn new() -> Self {
        Self {
            arm_probability: None,
        }
    }

    /// Shocks that redraw each arm with a fixed probability, independent of the intensity.
    pub const fn with_arm_probability(arm_probability: f64) -> Self {
        Self {
            arm_probability: Some(arm_probability),
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<f64, PolicyError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(PolicyError::InvalidParameter {
            name,
            value,
            range: "[0, 1]",
        })
    }
}

impl Turbulence for RandomShock {
    fn perturb<G, R>(
        &self,
        payoffs: &mut [f64],
        generator: &mut G,
        intensity: f64,
        rng: &mut R,
    ) -> Result<(), PolicyError>
    where
        G: PayoffGenerator + ?Sized,
        R: Rng + ?Sized,
    {
        let intensity = check_probability("turbulence intensity", intensity)?;
        let arm_probability = check_probability(
            "arm redraw probability",
            self.arm_probability.unwrap_or(intensity),
        )?;
        if intensity == 0.0 || rng.gen::<f64>() >= intensity {
            return Ok(());
        }
        for payoff in payoffs.iter_mut() {
            if rng.gen::<f64>() < arm_probability {
                *payoff = generator.draw_payoff(rng);
            }
        }
        Ok(())
    }
}
