//! Dispatch Core - nearest-agent package assignment
//!
//! A single pass over a static delivery plan:
//! 1. **Engine**: assigns each package to the agent closest to its warehouse,
//!    injecting one extra agent halfway through the run
//! 2. **Report**: rounds totals, derives per-agent efficiency, picks the best agent
//! 3. **Export**: JSON report, top-performer CSV, console route trace
//!
//! ```text
//! DispatchInput ──simulate──► SimulationOutcome ──Report::from_stats──► Report
//!                                   │                                    │
//!                                   └────────── export::* ◄──────────────┘
//! ```

pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod report;

// Re-export key types for convenience
pub use engine::{simulate, AgentStats, DeliveryStats, Injection, InjectionPlan, SimulationOutcome};
pub use error::DispatchError;
pub use model::{Coord, DispatchInput, Package, Roster};
pub use report::{AgentMetrics, Report};
