//! Core delay-source trait for the dispatch engine.

/// Upper bound (exclusive) of the delivery delay term, in distance units.
pub const MAX_DELAY: f64 = 10.0;

/// The interface for drawing the per-delivery delay.
///
/// Every assignment adds one draw to the agent's travelled distance.
/// Implementations decide where the entropy comes from:
///
/// - **Production**: `ThreadRngDelay` - uniform `[0, MAX_DELAY)` from `thread_rng`
/// - **Simulation**: `SeededDelay` (in `dispatch_sim`) - ChaCha8 from a seed
/// - **Tests**: `FixedDelay` - a constant
pub trait DelaySource {
    /// Returns the next delay value.
    fn next_delay(&mut self) -> f64;

    /// Returns the seed behind this source, if it is reproducible.
    ///
    /// Production sources return `None`.
    fn seed(&self) -> Option<u64> {
        None
    }
}

impl<D: DelaySource + ?Sized> DelaySource for &mut D {
    fn next_delay(&mut self) -> f64 {
        (**self).next_delay()
    }

    fn seed(&self) -> Option<u64> {
        (**self).seed()
    }
}

impl<D: DelaySource + ?Sized> DelaySource for Box<D> {
    fn next_delay(&mut self) -> f64 {
        (**self).next_delay()
    }

    fn seed(&self) -> Option<u64> {
        (**self).seed()
    }
}

/// Delay source that always yields the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDelay {
    value: f64,
}

impl FixedDelay {
    /// Creates a source returning `value` on every draw.
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    /// A source that adds nothing, so distances are pure geometry.
    pub fn zero() -> Self {
        Self::new(0.0)
    }
}

impl DelaySource for FixedDelay {
    fn next_delay(&mut self) -> f64 {
        self.value
    }
}
