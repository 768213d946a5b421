use super::{Id, LogError, Loggable, StatsLogger, TURN_COUNTER};
use crate::utils::stats::OnlineMeanVariance;
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

/// Write out summaries to a backend.
pub trait SummaryWriter: Send {
    /// Write the summaries of one chunk, in order of id.
    ///
    /// `elapsed` is the wall time covered by the chunk.
    fn write_summaries<'a, I>(&mut self, summaries: I, elapsed: Duration)
    where
        I: Iterator<Item = (Id, &'a ChunkSummary)>;
}

/// Summarizes logged values over chunks of simulation turns.
///
/// A chunk ends after every `turn_interval` turns, counted from increments logged under
/// [`TURN_COUNTER`]. The turn counter should be the last value logged in a turn's group so that
/// the chunk includes the rest of that turn. An interval of 0 only flushes on demand or when the
/// logger is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkLogger<W: SummaryWriter> {
    turn_interval: u64,
    writer: W,

    /// Turns counted in the current chunk.
    chunk_turns: u64,
    chunk_start: Instant,

    // Sorted so that summaries are written in a stable order
    summaries: BTreeMap<Id, ChunkSummary>,
    /// Ids updated in the current chunk.
    updated: BTreeSet<Id>,
}

impl<W: SummaryWriter> ChunkLogger<W> {
    pub fn new(turn_interval: u64, writer: W) -> Self {
        Self {
            turn_interval,
            writer,
            chunk_turns: 0,
            chunk_start: Instant::now(),
            summaries: BTreeMap::new(),
            updated: BTreeSet::new(),
        }
    }

    /// The writer backend.
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    /// Number of turns between flushes.
    pub const fn turn_interval(&self) -> u64 {
        self.turn_interval
    }
}

impl<W: SummaryWriter> StatsLogger for ChunkLogger<W> {
    fn group_start(&mut self) {}

    fn group_log(&mut self, id: Id, value: Loggable) -> Result<(), LogError> {
        match self.summaries.get_mut(id) {
            Some(summary) => summary.push(value)?,
            None => {
                self.summaries.insert(id, ChunkSummary::try_from(value)?);
            }
        }
        self.updated.insert(id);

        if let (TURN_COUNTER, Loggable::CounterIncrement(turns)) = (id, value) {
            self.chunk_turns += turns;
        }
        Ok(())
    }

    fn group_end(&mut self) {
        if self.turn_interval > 0 && self.chunk_turns >= self.turn_interval {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if !self.updated.is_empty() {
            let summaries = &self.summaries;
            self.writer.write_summaries(
                self.updated
                    .iter()
                    .filter_map(|id| summaries.get_key_value(id))
                    .map(|(id, summary)| (*id, summary)),
                self.chunk_start.elapsed(),
            );
        }

        for summary in self.summaries.values_mut() {
            summary.start_chunk();
        }
        self.updated.clear();
        self.chunk_turns = 0;
        self.chunk_start = Instant::now();
    }
}

impl<W: SummaryWriter> Drop for ChunkLogger<W> {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Summary of the values logged under one id within a chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkSummary {
    /// Counter value before the chunk and the total increment within it.
    Counter { previous: u64, increment: u64 },
    /// Durations in seconds.
    Duration { stats: OnlineMeanVariance<f64> },
    Scalar { stats: OnlineMeanVariance<f64> },
    /// Number of samples of each index.
    Index { counts: Vec<usize> },
}

impl TryFrom<Loggable> for ChunkSummary {
    type Error = LogError;

    fn try_from(value: Loggable) -> Result<Self, Self::Error> {
        let mut summary = match value {
            Loggable::CounterIncrement(_) => Self::Counter {
                previous: 0,
                increment: 0,
            },
            Loggable::Duration(_) => Self::Duration {
                stats: OnlineMeanVariance::default(),
            },
            Loggable::Scalar(_) => Self::Scalar {
                stats: OnlineMeanVariance::default(),
            },
            Loggable::Index { size, .. } => Self::Index {
                counts: vec![0; size],
            },
        };
        summary.push(value)?;
        Ok(summary)
    }
}

impl ChunkSummary {
    /// Add a value to the summary.
    ///
    /// The summary is unchanged if the value has a different kind or index size than the values
    /// it was created from.
    fn push(&mut self, value: Loggable) -> Result<(), LogError> {
        match (self, value) {
            (Self::Counter { increment, .. }, Loggable::CounterIncrement(i)) => *increment += i,
            (Self::Duration { stats }, Loggable::Duration(d)) => stats.push(d.as_secs_f64()),
            (Self::Scalar { stats }, Loggable::Scalar(x)) => stats.push(x),
            (Self::Index { counts }, Loggable::Index { value, size }) => {
                if counts.len() != size {
                    return Err(LogError::IncompatibleIndexSize {
                        prev: counts.len(),
                        now: size,
                    });
                }
                let count = counts
                    .get_mut(value)
                    .ok_or(LogError::IndexOutOfBounds { value, size })?;
                *count += 1;
            }
            (summary, value) => {
                return Err(LogError::IncompatibleValue {
                    prev: summary.kind(),
                    now: value.variant_name(),
                })
            }
        }
        Ok(())
    }

    /// Clear the per-chunk statistics. Counters carry their running total forward.
    fn start_chunk(&mut self) {
        match self {
            Self::Counter {
                previous,
                increment,
            } => {
                *previous += *increment;
                *increment = 0;
            }
            Self::Duration { stats } | Self::Scalar { stats } => {
                *stats = OnlineMeanVariance::default();
            }
            Self::Index { counts } => counts.fill(0),
        }
    }

    /// The name of the loggable variant this summarizes.
    const fn kind(&self) -> &'static str {
        match self {
            Self::Counter { .. } => "CounterIncrement",
            Self::Duration { .. } => "Duration",
            Self::Scalar { .. } => "Scalar",
            Self::Index { .. } => "Index",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingWriter;

    fn log_turn(logger: &mut ChunkLogger<RecordingWriter>, x: f64) {
        logger.group_start();
        logger.group_log("x", Loggable::Scalar(x)).unwrap();
        logger
            .group_log(TURN_COUNTER, Loggable::CounterIncrement(1))
            .unwrap();
        logger.group_end();
    }

    #[test]
    fn scalar_mean_per_chunk() {
        let mut logger = ChunkLogger::new(2, RecordingWriter::default());
        for (i, x) in [1.0, 3.0, 10.0, 20.0].into_iter().enumerate() {
            log_turn(&mut logger, x);
            assert_eq!(logger.writer().chunks.len(), (i + 1) / 2);
        }
        let chunks = &logger.writer().chunks;
        let mean_of = |chunk: &Vec<(Id, ChunkSummary)>| match &chunk[1] {
            ("x", ChunkSummary::Scalar { stats }) => stats.mean(),
            other => panic!("unexpected summary {:?}", other),
        };
        assert_eq!(mean_of(&chunks[0]), 2.0);
        assert_eq!(mean_of(&chunks[1]), 15.0);
        assert_eq!(
            chunks[1][0],
            (
                TURN_COUNTER,
                ChunkSummary::Counter {
                    previous: 2,
                    increment: 2
                }
            )
        );
    }

    #[test]
    fn other_counters_do_not_end_chunks() {
        let mut logger = ChunkLogger::new(1, RecordingWriter::default());
        logger.log_counter_increment("steps", 5).unwrap();
        assert!(logger.writer().chunks.is_empty());
    }

    #[test]
    fn zero_interval_flushes_on_drop() {
        let mut logger = ChunkLogger::new(0, RecordingWriter::default());
        for x in [1.0, 2.0, 3.0] {
            log_turn(&mut logger, x);
        }
        assert!(logger.writer().chunks.is_empty());
        logger.flush();
        assert_eq!(logger.writer().chunks.len(), 1);
    }

    #[test]
    fn index_counts() {
        let mut logger = ChunkLogger::new(100, RecordingWriter::default());
        for value in [0, 2, 2] {
            logger.log_index("choice", value, 3).unwrap();
        }
        logger.flush();
        assert_eq!(
            logger.writer().chunks[0],
            vec![("choice", ChunkSummary::Index { counts: vec![1, 0, 2] })]
        );
    }

    #[test]
    fn incompatible_value() {
        let mut logger = ChunkLogger::new(100, RecordingWriter::default());
        logger.log_scalar("x", 1.0).unwrap();
        assert_eq!(
            logger.log_counter_increment("x", 1),
            Err(LogError::IncompatibleValue {
                prev: "Scalar",
                now: "CounterIncrement"
            })
        );
    }

    #[test]
    fn index_out_of_bounds() {
        let mut logger = ChunkLogger::new(100, RecordingWriter::default());
        assert_eq!(
            logger.log_index("choice", 3, 3),
            Err(LogError::IndexOutOfBounds { value: 3, size: 3 })
        );
        logger.flush();
        assert!(logger.writer().chunks.is_empty());
    }

    #[test]
    fn rejected_turn_increment_is_not_counted() {
        let mut logger = ChunkLogger::new(2, RecordingWriter::default());
        logger.log_scalar(TURN_COUNTER, 0.0).unwrap();
        logger.flush();
        for _ in 0..3 {
            assert!(logger.log_counter_increment(TURN_COUNTER, 1).is_err());
        }
        assert_eq!(logger.writer().chunks.len(), 1);
    }

    #[test]
    fn flush_boundary_after_rejected_value() {
        let mut logger = ChunkLogger::new(1, RecordingWriter::default());
        logger.log_scalar("x", 0.0).unwrap();
        logger.flush();

        logger.group_start();
        assert!(logger.group_log("x", Loggable::CounterIncrement(1)).is_err());
        logger
            .group_log(TURN_COUNTER, Loggable::CounterIncrement(1))
            .unwrap();
        logger.group_end();
        assert_eq!(logger.writer().chunks.len(), 2);
    }

    #[test]
    fn clean_chunks_are_not_written() {
        let mut logger = ChunkLogger::new(100, RecordingWriter::default());
        logger.log_scalar("x", 1.0).unwrap();
        logger.flush();
        logger.flush();
        assert_eq!(logger.writer().chunks.len(), 1);
    }
}
