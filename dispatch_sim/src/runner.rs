//! Pipeline runner - load, simulate, report, export.

use crate::context::SeededDelay;

use dispatch_core::export::{
    write_completion_banner, write_injection_banner, write_report_file, write_routes,
    write_top_agent_file,
};
use dispatch_core::{simulate, DispatchError, DispatchInput, InjectionPlan, Report};
use dispatch_env::{DelaySource, ThreadRngDelay};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Default input document.
pub const DEFAULT_INPUT: &str = "data.json";

/// Default report document.
pub const DEFAULT_REPORT: &str = "report.json";

/// Default top-performer CSV.
pub const DEFAULT_CSV: &str = "top_agent.csv";

/// Configuration for a dispatch run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Input document path
    pub input_path: PathBuf,

    /// Report document path
    pub report_path: PathBuf,

    /// Top-performer CSV path
    pub csv_path: PathBuf,

    /// Seed for the delay stream (None = OS entropy, not reproducible)
    pub seed: Option<u64>,

    /// Agent joining halfway through the run
    pub injection: InjectionPlan,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            report_path: PathBuf::from(DEFAULT_REPORT),
            csv_path: PathBuf::from(DEFAULT_CSV),
            seed: None,
            injection: InjectionPlan::default(),
        }
    }
}

impl SimConfig {
    /// Builds the delay source this configuration asks for.
    pub fn delay_source(&self) -> Box<dyn DelaySource> {
        match self.seed {
            Some(seed) => Box::new(SeededDelay::new(seed)),
            None => Box::new(ThreadRngDelay::new()),
        }
    }
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Writing the route trace to the console failed
    #[error("Console output failed: {0}")]
    Console(#[from] io::Error),
}

/// Results from a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Packages in the input document
    pub packages: usize,

    /// Agents in the final roster
    pub agents: usize,

    /// Sum of deliveries over all agents
    pub total_delivered: u64,

    /// Agent that joined mid-run, if any
    pub injected_agent: Option<String>,

    /// Package index at which it joined
    pub injected_at: Option<usize>,

    pub best_agent: Option<String>,

    /// Delay seed (None when unseeded)
    pub seed: Option<u64>,
}

/// Runs the full pipeline for one configuration.
pub struct DispatchRunner {
    config: SimConfig,
}

impl DispatchRunner {
    /// Creates a new runner.
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    /// Runs with the delay source selected by the configuration.
    pub fn run<W: Write>(&self, out: W) -> Result<RunSummary, SimError> {
        let mut delay = self.config.delay_source();
        self.run_with(delay.as_mut(), out)
    }

    /// Runs with an explicit delay source.
    ///
    /// Console output (join banner, route trace, completion banner) goes to
    /// `out`. Any failure aborts the run; the report may already be on disk
    /// when the CSV fails.
    pub fn run_with<D, W>(&self, delay: &mut D, mut out: W) -> Result<RunSummary, SimError>
    where
        D: DelaySource + ?Sized,
        W: Write,
    {
        let cfg = &self.config;
        info!("Loading {}", cfg.input_path.display());
        let input = DispatchInput::load(&cfg.input_path)?;
        debug!(
            "{} warehouses, {} agents, {} packages",
            input.warehouses.len(),
            input.agents.len(),
            input.packages.len()
        );

        let seed = delay.seed();
        let outcome = simulate(&input, &cfg.injection, delay)?;
        if let Some(injection) = &outcome.injection {
            write_injection_banner(&mut out, injection)?;
        }

        let report = Report::from_stats(&outcome.stats);

        write_report_file(&report, &cfg.report_path)?;
        info!("Wrote report to {}", cfg.report_path.display());

        write_top_agent_file(&report, &cfg.csv_path)?;
        info!("Wrote top performer to {}", cfg.csv_path.display());

        write_routes(&mut out, &outcome.stats)?;
        write_completion_banner(&mut out, &report)?;
        out.flush()?;

        Ok(RunSummary {
            packages: input.packages.len(),
            agents: outcome.stats.len(),
            total_delivered: outcome.stats.total_delivered(),
            injected_agent: outcome.injection.as_ref().map(|i| i.agent_id.clone()),
            injected_at: outcome.injection.as_ref().map(|i| i.index),
            best_agent: report.best_agent().map(str::to_string),
            seed,
        })
    }
}
