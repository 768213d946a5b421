//! Arm payoff generators.
use rand::distributions::Distribution;
use rand::Rng;
use rand_distr::{Beta, BetaError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Produces true arm payoffs (win probabilities).
///
/// Called once per arm when a simulation is constructed and again by
/// [`Turbulence`][crate::Turbulence] policies whenever an arm payoff is redrawn.
pub trait PayoffGenerator {
    /// Draw a single payoff in `[0, 1]`.
    fn draw_payoff<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64;
}

impl<T: PayoffGenerator + ?Sized> PayoffGenerator for &'_ mut T {
    fn draw_payoff<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        T::draw_payoff(self, rng)
    }
}

/// Error building a payoff generator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildPayoffsError {
    #[error(transparent)]
    Beta(#[from] BetaError),
    #[error("no payoffs given")]
    Empty,
    #[error("payoff {0} is outside [0, 1]")]
    OutOfRange(f64),
}

/// Payoffs drawn from a Beta distribution.
///
/// The default `Beta(2, 2)` is bell-shaped on `[0, 1]` with mean 0.5 and standard deviation
/// about 0.22.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BetaPayoffsConfig", into = "BetaPayoffsConfig")]
pub struct BetaPayoffs {
    alpha: f64,
    beta: f64,
    distribution: Beta<f64>,
}

impl BetaPayoffs {
    /// Create a new Beta payoff generator.
    ///
    /// # Errors
    /// If either shape parameter is not strictly positive.
    pub fn new(alpha: f64, beta: f64) -> Result<Self, BuildPayoffsError> {
        Ok(Self {
            alpha,
            beta,
            distribution: Beta::new(alpha, beta)?,
        })
    }

    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    pub const fn beta(&self) -> f64 {
        self.beta
    }
}

impl PartialEq for BetaPayoffs {
    fn eq(&self, other: &Self) -> bool {
        self.alpha == other.alpha && self.beta == other.beta
    }
}

impl Default for BetaPayoffs {
    fn default() -> Self {
        Self::new(2.0, 2.0).expect("valid default shape parameters")
    }
}

impl PayoffGenerator for BetaPayoffs {
    fn draw_payoff<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        self.distribution.sample(rng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct BetaPayoffsConfig {
    alpha: f64,
    beta: f64,
}

impl TryFrom<BetaPayoffsConfig> for BetaPayoffs {
    type Error = BuildPayoffsError;

    fn try_from(config: BetaPayoffsConfig) -> Result<Self, Self::Error> {
        Self::new(config.alpha, config.beta)
    }
}

impl From<BetaPayoffs> for BetaPayoffsConfig {
    fn from(payoffs: BetaPayoffs) -> Self {
        Self {
            alpha: payoffs.alpha,
            beta: payoffs.beta,
        }
    }
}

/// Replays a fixed sequence of payoffs, cycling back to the start when exhausted.
///
/// Does not consume any randomness.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPayoffs {
    values: Vec<f64>,
    next: usize,
}

impl FixedPayoffs {
    /// # Errors
    /// If `values` is empty or any value lies outside `[0, 1]`.
    pub fn new(values: Vec<f64>) -> Result<Self, BuildPayoffsError> {
        if values.is_empty() {
            return Err(BuildPayoffsError::Empty);
        }
        if let Some(&v) = values.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(BuildPayoffsError::OutOfRange(v));
        }
        Ok(Self { values, next: 0 })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl PayoffGenerator for FixedPayoffs {
    fn draw_payoff<R: Rng + ?Sized>(&mut self, _: &mut R) -> f64 {
        let value = self.values[self.next];
        self.next = (self.next + 1) % self.values.len();
        value
    }
}
