//! Uniform random source.
//!
//! The core only ever asks for a uniformly distributed integer in an
//! inclusive range. [`SimRng`] is the deterministic implementation seeded
//! from the world seed; [`ScriptedRandom`] replays fixed answers for tests
//! and replays.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniform random integers.
pub trait RandomSource {
    /// Returns a value in `low..=high`. If `high < low`, returns `low`.
    fn random(&mut self, low: i64, high: i64) -> i64;

    /// Returns a uniformly chosen index into a slice of length `len`.
    ///
    /// `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        let high = i64::try_from(len.saturating_sub(1)).unwrap_or(i64::MAX);
        usize::try_from(self.random(0, high)).unwrap_or(0)
    }
}

/// Deterministic `ChaCha8` random source.
#[derive(Clone, Debug)]
pub struct SimRng {
    rng: ChaCha8Rng,
}

impl SimRng {
    /// Creates a source seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SimRng {
    fn random(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}

/// Replays a fixed sequence of answers, clamped into the requested range.
///
/// Once the script runs out, every call returns `low`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    script: VecDeque<i64>,
}

impl ScriptedRandom {
    /// Creates a source that will answer with `values` in order.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            script: values.into_iter().collect(),
        }
    }

    /// Returns how many scripted answers remain.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn random(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        match self.script.pop_front() {
            Some(v) => v.clamp(low, high),
            None => low,
        }
    }
}
