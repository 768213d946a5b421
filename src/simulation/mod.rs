//! Turn-by-turn bandit simulation
mod bandit;
mod config;
mod history;
mod summary;

pub use bandit::{Bandit, Turn};
pub use config::BanditConfig;
pub use history::{History, TurnMetrics};
pub use summary::RunSummary;
