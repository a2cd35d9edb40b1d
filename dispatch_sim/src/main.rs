//! Dispatch simulator CLI
//!
//! Reads `data.json`, assigns every package to its nearest agent and writes
//! `report.json` and `top_agent.csv` in the working directory.

use clap::Parser;
use dispatch_sim::{DispatchRunner, SimConfig, DEFAULT_CSV, DEFAULT_INPUT, DEFAULT_REPORT};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Nearest-agent delivery dispatch simulator
#[derive(Parser, Debug)]
#[command(name = "dispatch-sim")]
#[command(about = "Assign packages to the nearest delivery agent and report the top performer", long_about = None)]
struct Args {
    /// Input document
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Report document to write
    #[arg(short, long, default_value = DEFAULT_REPORT)]
    report: PathBuf,

    /// Top-performer CSV to write
    #[arg(short, long, default_value = DEFAULT_CSV)]
    csv: PathBuf,

    /// Seed for the delivery delay (omit for a non-reproducible run)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print a JSON run summary after the route trace
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging; stdout is reserved for the route trace
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let config = SimConfig {
        input_path: args.input,
        report_path: args.report,
        csv_path: args.csv,
        seed: args.seed,
        ..Default::default()
    };

    match config.seed {
        Some(seed) => info!("Delay stream seeded with {}", seed),
        None => info!("Delay stream unseeded"),
    }

    let runner = DispatchRunner::new(config);
    let summary = match runner.run(std::io::stdout().lock()) {
        Ok(summary) => summary,
        Err(e) => {
            error!("❌ Dispatch run failed: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "✓ {} packages delivered by {} agents",
        summary.total_delivered, summary.agents
    );

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to encode summary: {}", e);
                std::process::exit(1);
            }
        }
    }
}
