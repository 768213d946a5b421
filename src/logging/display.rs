//! Command-line logger
use super::chunk::{ChunkLogger, ChunkSummary, SummaryWriter};
use super::{Id, LogError, Loggable, StatsLogger};
use std::fmt;
use std::time::Duration;
use yansi::Paint;

/// Logger that displays summaries to standard output every `turn_interval` turns.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayLogger(ChunkLogger<DisplayBackend>);

impl DisplayLogger {
    #[inline]
    pub fn new(turn_interval: u64) -> Self {
        Self(ChunkLogger::new(turn_interval, DisplayBackend))
    }
}

impl StatsLogger for DisplayLogger {
    #[inline]
    fn group_start(&mut self) {
        self.0.group_start()
    }
    #[inline]
    fn group_log(&mut self, id: Id, value: Loggable) -> Result<(), LogError> {
        self.0.group_log(id, value)
    }
    #[inline]
    fn group_end(&mut self) {
        self.0.group_end()
    }
    #[inline]
    fn flush(&mut self) {
        self.0.flush()
    }
}

/// Logging backend that displays summaries to standard output.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DisplayBackend;

impl SummaryWriter for DisplayBackend {
    fn write_summaries<'a, I>(&mut self, summaries: I, elapsed: Duration)
    where
        I: Iterator<Item = (Id, &'a ChunkSummary)>,
    {
        println!();
        for (id, summary) in summaries {
            println!(
                "{:<24} {}",
                Paint::fixed(35, id),
                DisplaySummary {
                    summary,
                    elapsed: &elapsed
                }
            );
        }
    }
}

#[derive(Debug)]
struct DisplaySummary<'a> {
    summary: &'a ChunkSummary,
    elapsed: &'a Duration,
}

impl<'a> fmt::Display for DisplaySummary<'a> {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.summary {
            ChunkSummary::Counter {
                previous,
                increment,
            } => {
                write!(
                    f,
                    "{}  (+{})",
                    previous + increment,
                    Paint::fixed(253, increment)
                )?;
                if *increment > 5 {
                    // Not very accurate unless there are several increments in this chunk
                    let rate = *increment as f64 / self.elapsed.as_secs_f64();
                    write!(f, "  {}", Paint::fixed(111, format!("{:.2}/s", rate)))?;
                }
                Ok(())
            }
            ChunkSummary::Duration { stats } => {
                if stats.count() > 0 {
                    write!(f, "{:.4?}", Duration::from_secs_f64(stats.mean()))?;
                    if stats.count() > 1 {
                        let stddev = format!("(σ {:.4?})", Duration::from_secs_f64(stats.stddev()));
                        write!(f, " {}", Paint::fixed(8, stddev))?;
                    }
                }
                Ok(())
            }
            ChunkSummary::Scalar { stats } => {
                if stats.count() > 0 {
                    write!(f, "{:.3}", stats.mean())?;
                    if stats.count() > 1 {
                        let stddev = format!("(σ {:.3})", stats.stddev());
                        write!(f, " {}", Paint::fixed(8, stddev))?;
                    }
                }
                Ok(())
            }
            ChunkSummary::Index { counts } => {
                let n: usize = counts.iter().sum();
                write!(f, "(n {})  [", n)?;
                for (i, c) in counts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", c * 100 / n.max(1))?;
                }
                write!(f, "]%")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::stats::OnlineMeanVariance;

    fn display(summary: &ChunkSummary) -> String {
        Paint::disable();
        DisplaySummary {
            summary,
            elapsed: &Duration::from_secs(1),
        }
        .to_string()
    }

    #[test]
    fn display_scalar() {
        let stats: OnlineMeanVariance<f64> = [1.0, 3.0].into_iter().collect();
        assert_eq!(
            display(&ChunkSummary::Scalar { stats }),
            "2.000 (σ 1.000)"
        );
    }

    #[test]
    fn display_index() {
        let summary = ChunkSummary::Index {
            counts: vec![1, 3, 0, 0],
        };
        assert_eq!(display(&summary), "(n 4)  [25 75 0 0]%");
    }

    #[test]
    fn display_counter() {
        let summary = ChunkSummary::Counter {
            previous: 8,
            increment: 2,
        };
        assert_eq!(display(&summary), "10  (+2)");
    }
}
