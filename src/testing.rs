//! Test doubles
use crate::logging::{ChunkSummary, Id, SummaryWriter};
use rand::{Error, RngCore};
use std::collections::VecDeque;
use std::time::Duration;

/// Random number generator that replays a fixed script of outputs.
///
/// Panics when the script is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedRng {
    outputs: VecDeque<u64>,
}

impl ScriptedRng {
    /// Script the values produced by successive `rng.gen::<f64>()` calls.
    ///
    /// Each value must lie in `[0, 1)`; it is reproduced to 53 bits of precision.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn uniform(values: &[f64]) -> Self {
        // The standard f64 distribution keeps the 53 most significant bits of a u64
        let outputs = values
            .iter()
            .map(|&x| {
                assert!((0.0..1.0).contains(&x), "{} is outside [0, 1)", x);
                ((x * (1u64 << 53) as f64) as u64) << 11
            })
            .collect();
        Self { outputs }
    }

    /// Number of unconsumed outputs.
    pub fn remaining(&self) -> usize {
        self.outputs.len()
    }
}

impl RngCore for ScriptedRng {
    #[allow(clippy::cast_possible_truncation)]
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.outputs.pop_front().expect("rng script exhausted")
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Summary writer that records every flushed chunk.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingWriter {
    pub chunks: Vec<Vec<(Id, ChunkSummary)>>,
}

impl SummaryWriter for RecordingWriter {
    fn write_summaries<'a, I>(&mut self, summaries: I, _elapsed: Duration)
    where
        I: Iterator<Item = (Id, &'a ChunkSummary)>,
    {
        self.chunks
            .push(summaries.map(|(id, s)| (id, s.clone())).collect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn scripted_uniform_values() {
        let mut rng = ScriptedRng::uniform(&[0.5, 0.0, 0.25]);
        assert_eq!(rng.gen::<f64>(), 0.5);
        assert_eq!(rng.gen::<f64>(), 0.0);
        assert_eq!(rng.gen::<f64>(), 0.25);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn scripted_uniform_close() {
        let mut rng = ScriptedRng::uniform(&[0.05]);
        assert!((rng.gen::<f64>() - 0.05).abs() < 1e-15);
    }
}
