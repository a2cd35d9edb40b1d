//! Production implementation of DelaySource using the thread-local RNG.

use crate::context::{DelaySource, MAX_DELAY};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::ThreadRng;

/// Production delay source backed by OS entropy.
///
/// Draws are uniform in `[0, MAX_DELAY)` and are not reproducible across runs.
pub struct ThreadRngDelay {
    rng: ThreadRng,
    range: Uniform<f64>,
}

impl ThreadRngDelay {
    /// Creates a new ThreadRngDelay.
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            range: Uniform::new(0.0, MAX_DELAY),
        }
    }
}

impl Default for ThreadRngDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelaySource for ThreadRngDelay {
    fn next_delay(&mut self) -> f64 {
        self.range.sample(&mut self.rng)
    }
}
