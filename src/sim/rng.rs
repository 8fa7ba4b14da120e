//! Random source for laser aiming
//!
//! The engine never owns a generator. Callers pass a `LaserSource` into
//! `RoundEngine::generate_laser`, so seeded or scripted sources can stand in
//! for the ambient one.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Draws needed to aim one laser
pub trait LaserSource {
    /// Fair coin: true picks a row sweep
    fn coin_flip(&mut self) -> bool;
    /// Uniform index in `[0, bound)`. `bound` is at least 1.
    fn index_below(&mut self, bound: u32) -> u32;
}

impl<R: Rng> LaserSource for R {
    fn coin_flip(&mut self) -> bool {
        self.random_bool(0.5)
    }

    fn index_below(&mut self, bound: u32) -> u32 {
        self.random_range(0..bound.max(1))
    }
}

/// Seed wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
