//! Logging statistics from simulation runs
mod chunk;
mod display;

pub use chunk::{ChunkLogger, ChunkSummary, SummaryWriter};
pub use display::{DisplayBackend, DisplayLogger};

use std::time::Duration;
use thiserror::Error;

/// Identifier of a logged value.
pub type Id = &'static str;

/// Counter incremented once at the end of every simulated turn.
pub const TURN_COUNTER: Id = "turn";

/// A value that can be logged.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Loggable {
    /// Increment a counter by the given amount.
    CounterIncrement(u64),
    /// A duration. Aggregate by taking means.
    Duration(Duration),
    /// A scalar value. Aggregate by taking means.
    Scalar(f64),
    /// A sample from a distribution over `0 .. size`.
    Index { value: usize, size: usize },
}

impl Loggable {
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::CounterIncrement(_) => "CounterIncrement",
            Self::Duration(_) => "Duration",
            Self::Scalar(_) => "Scalar",
            Self::Index { .. } => "Index",
        }
    }
}

impl From<f64> for Loggable {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Duration> for Loggable {
    fn from(value: Duration) -> Self {
        Self::Duration(value)
    }
}

/// Error logging a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    #[error("incompatible value type; previously {prev} now {now}")]
    IncompatibleValue {
        prev: &'static str,
        now: &'static str,
    },
    #[error("incompatible index size; previously {prev} now {now}")]
    IncompatibleIndexSize { prev: usize, now: usize },
    #[error("index {value} out of bounds for size {size}")]
    IndexOutOfBounds { value: usize, size: usize },
}

/// Log statistics from a simulation run.
///
/// Values are logged in groups. All values logged within a group belong to the same summary
/// chunk.
pub trait StatsLogger: Send {
    /// Start a new group of values.
    fn group_start(&mut self);

    /// Log a value within the current group.
    ///
    /// # Errors
    /// If the value is structurally incompatible with previous values logged under `id`.
    fn group_log(&mut self, id: Id, value: Loggable) -> Result<(), LogError>;

    /// End the current group.
    fn group_end(&mut self);

    /// Write out any pending summaries.
    fn flush(&mut self);

    /// Log a single value as its own group.
    ///
    /// # Errors
    /// If the value is structurally incompatible with previous values logged under `id`.
    fn log(&mut self, id: Id, value: Loggable) -> Result<(), LogError> {
        self.group_start();
        let result = self.group_log(id, value);
        self.group_end();
        result
    }

    /// Log a scalar value.
    ///
    /// # Errors
    /// If a non-scalar value was previously logged under `id`.
    fn log_scalar(&mut self, id: Id, value: f64) -> Result<(), LogError> {
        self.log(id, Loggable::Scalar(value))
    }

    /// Log a sample from a distribution over `0 .. size`.
    ///
    /// # Errors
    /// If `value` is out of bounds or a different kind or size was previously logged under `id`.
    fn log_index(&mut self, id: Id, value: usize, size: usize) -> Result<(), LogError> {
        self.log(id, Loggable::Index { value, size })
    }

    /// Log a duration.
    ///
    /// # Errors
    /// If a non-duration value was previously logged under `id`.
    fn log_duration(&mut self, id: Id, duration: Duration) -> Result<(), LogError> {
        self.log(id, Loggable::Duration(duration))
    }

    /// Log a counter increment.
    ///
    /// # Errors
    /// If a non-counter value was previously logged under `id`.
    fn log_counter_increment(&mut self, id: Id, increment: u64) -> Result<(), LogError> {
        self.log(id, Loggable::CounterIncrement(increment))
    }
}

/// Logger that does nothing
impl StatsLogger for () {
    #[inline]
    fn group_start(&mut self) {}
    #[inline]
    fn group_log(&mut self, _: Id, _: Loggable) -> Result<(), LogError> {
        Ok(())
    }
    #[inline]
    fn group_end(&mut self) {}
    #[inline]
    fn flush(&mut self) {}
}

impl<L: StatsLogger + ?Sized> StatsLogger for &'_ mut L {
    #[inline]
    fn group_start(&mut self) {
        L::group_start(self)
    }
    #[inline]
    fn group_log(&mut self, id: Id, value: Loggable) -> Result<(), LogError> {
        L::group_log(self, id, value)
    }
    #[inline]
    fn group_end(&mut self) {
        L::group_end(self)
    }
    #[inline]
    fn flush(&mut self) {
        L::flush(self)
    }
}
