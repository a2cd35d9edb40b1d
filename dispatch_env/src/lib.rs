//! Dispatch Environment Abstraction Layer
//!
//! The only source of non-determinism in a dispatch run is the per-delivery
//! delay term. This crate pulls it behind the [`DelaySource`] trait so the
//! engine never touches an RNG directly:
//!
//! - **Production**: [`ThreadRngDelay`] draws from the thread-local OS-seeded RNG
//! - **Testing**: [`FixedDelay`] returns the same value every time
//!
//! Seeded, reproducible sources live in `dispatch_sim`.
//!
//! # Example
//!
//! ```
//! use dispatch_env::{DelaySource, FixedDelay};
//!
//! let mut delay = FixedDelay::new(2.5);
//! assert_eq!(delay.next_delay(), 2.5);
//! ```

mod context;
mod rng_impl;

pub use context::{DelaySource, FixedDelay, MAX_DELAY};
pub use rng_impl::ThreadRngDelay;
