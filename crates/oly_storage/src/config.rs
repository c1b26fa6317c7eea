//! Configuration for the world store.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default table capacity: handles run `1..DEFAULT_MAX_HANDLE`.
pub const DEFAULT_MAX_HANDLE: u32 = 100_000;

/// Configuration for a [`crate::World`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldConfig {
    /// Exclusive upper bound on handles.
    pub max_handle: u32,

    /// Seed for the world's random source.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_handle: DEFAULT_MAX_HANDLE,
            seed: 0,
        }
    }
}

impl WorldConfig {
    /// Creates a small configuration suited to unit tests.
    #[must_use]
    pub fn small() -> Self {
        Self {
            max_handle: 1_000,
            ..Self::default()
        }
    }

    /// Builder method to set the table capacity.
    #[must_use]
    pub fn with_max_handle(mut self, max_handle: u32) -> Self {
        self.max_handle = max_handle.max(2);
        self
    }

    /// Builder method to set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Step budget for every bounded graph walk.
    ///
    /// No acyclic walk can visit more entities than the table holds.
    #[must_use]
    pub fn traversal_limit(&self) -> usize {
        self.max_handle as usize
    }
}
