//! Error types
use crate::logging::LogError;
use thiserror::Error;

/// Error initializing or running a bandit simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("policy rejected the initial state")]
    InvalidPolicy(#[source] PolicyError),
    #[error("policy error on turn {turn}")]
    Policy {
        turn: usize,
        #[source]
        source: PolicyError,
    },
    #[error("simulation already completed all {0} turns")]
    AlreadyComplete(usize),
    #[error("simulation was aborted by an earlier error")]
    Aborted,
    #[error("error logging simulation statistics")]
    Log(#[from] LogError),
}

/// A policy function failed or produced a malformed result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    #[error("expected {expected} values, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("probability {value} for arm {arm} is negative or not finite")]
    InvalidProbability { arm: usize, value: f64 },
    #[error("choice probabilities sum to {0} instead of 1")]
    NotNormalized(f64),
    #[error("payoff {value} for arm {arm} is outside [0, 1]")]
    PayoffOutOfRange { arm: usize, value: f64 },
    #[error("belief {value} for arm {arm} is outside [0, 1]")]
    BeliefOutOfRange { arm: usize, value: f64 },
    #[error("{name} = {value} is outside the valid range {range}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        range: &'static str,
    },
}
