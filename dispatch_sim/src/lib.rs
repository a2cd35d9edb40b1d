//! Dispatch Simulator Harness
//!
//! Wires the dispatch pipeline to the filesystem and the console:
//!
//! ```text
//! data.json ─► DispatchInput ─► simulate ─► Report ─┬─► report.json
//!                                                   ├─► top_agent.csv
//!                                                   └─► stdout (route trace)
//! ```
//!
//! The delay term is the only source of non-determinism. Without a seed
//! the run draws from OS entropy; with one, the whole run repeats exactly.
//!
//! # Usage
//!
//! ```no_run
//! use dispatch_sim::{DispatchRunner, SimConfig};
//!
//! let config = SimConfig {
//!     seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let summary = DispatchRunner::new(config).run(std::io::stdout()).unwrap();
//! println!("best agent: {:?}", summary.best_agent);
//! ```

mod context;
mod runner;

#[cfg(test)]
mod properties;

pub use context::SeededDelay;
pub use runner::{
    DispatchRunner, RunSummary, SimConfig, SimError, DEFAULT_CSV, DEFAULT_INPUT, DEFAULT_REPORT,
};
