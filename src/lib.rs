//! Multi-armed bandit simulation with payoff turbulence.
//!
//! A single gambler repeatedly chooses among a fixed set of arms with unknown and possibly
//! drifting win probabilities, forms beliefs about each arm from observed outcomes, and
//! accumulates a running asset stock.
//! The model follows Posen & Levinthal, "Chasing a Moving Target: Exploitation and Exploration
//! in Dynamic Environments" (Management Science, 2012).
//!
//! # Example
//! ```
//! use turbulent_bandits::BanditConfig;
//!
//! let mut bandit = BanditConfig::default().build(0).unwrap();
//! assert_eq!(bandit.score(), None);
//! bandit.simulate(&mut ()).unwrap();
//! assert!(bandit.score().is_some());
//! ```
#![warn(clippy::cast_lossless)]
#![warn(clippy::cast_possible_truncation)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::missing_const_for_fn)] // has some false positives
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::redundant_closure_for_method_calls)]
#![warn(clippy::use_self)] // also triggered by macro expansions
mod error;
pub mod logging;
pub mod payoffs;
pub mod policies;
pub mod simulation;
#[cfg(test)]
pub(crate) mod testing;
pub mod utils;

pub use error::{PolicyError, SimulationError};
pub use payoffs::{BetaPayoffs, FixedPayoffs, PayoffGenerator};
pub use policies::{
    BeliefUpdate, EpsilonGreedy, LaplaceBelief, NoTurbulence, RandomShock, Softmax, Strategy,
    Turbulence,
};
pub use simulation::{Bandit, BanditConfig, History, RunSummary, Turn, TurnMetrics};

/// Pseudo-random number generator type used by default for simulations.
pub type Prng = rand_chacha::ChaCha8Rng;
