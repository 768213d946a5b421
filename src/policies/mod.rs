//! Pluggable gambler and environment policies.
//!
//! A simulation is parameterized by one policy per role:
//! * [`Turbulence`] - how true arm payoffs drift between turns.
//! * [`Strategy`] - how beliefs map to arm selection probabilities.
//! * [`BeliefUpdate`] - how observed outcomes update beliefs.
mod belief;
mod strategy;
mod turbulence;

pub use belief::{BeliefUpdate, LaplaceBelief};
pub use strategy::{sample_index, EpsilonGreedy, Softmax, Strategy};
pub use turbulence::{NoTurbulence, RandomShock, Turbulence};
