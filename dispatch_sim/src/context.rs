//! Seeded delay source for reproducible runs.

use dispatch_env::{DelaySource, MAX_DELAY};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Uniform};

/// Delay source backed by a seeded ChaCha8 RNG.
///
/// Two sources built from the same seed yield the same delay stream, so a
/// whole run (totals, efficiencies, best agent) repeats exactly.
pub struct SeededDelay {
    /// Master seed for this run
    seed: u64,

    rng: ChaCha8Rng,

    range: Uniform<f64>,
}

impl SeededDelay {
    /// Creates a new SeededDelay with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            range: Uniform::new(0.0, MAX_DELAY),
        }
    }
}

impl DelaySource for SeededDelay {
    fn next_delay(&mut self) -> f64 {
        self.range.sample(&mut self.rng)
    }

    fn seed(&self) -> Option<u64> {
        Some(self.seed)
    }
}
