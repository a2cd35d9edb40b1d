//! Exporters for the final report.
//!
//! - JSON report document (4-space indent), and a loader for reading it back
//! - Top-performer CSV
//! - Console route trace with banners

use crate::engine::{DeliveryStats, Injection};
use crate::error::DispatchError;
use crate::report::{AgentMetrics, Report};
use csv::{Terminator, WriterBuilder};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// Header row of the top-performer CSV.
pub const CSV_HEADER: [&str; 4] = ["Agent", "Packages", "Total Distance", "Efficiency"];

/// Writes the report as pretty-printed JSON with 4-space indentation.
pub fn write_report<W: Write>(report: &Report, writer: W) -> Result<(), serde_json::Error> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    report.serialize(&mut ser)
}

/// Writes the report document to `path`.
pub fn write_report_file(report: &Report, path: impl AsRef<Path>) -> Result<(), DispatchError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| DispatchError::write(path, e))?;
    let mut writer = BufWriter::new(file);
    write_report(report, &mut writer).map_err(|e| DispatchError::write(path, e.into()))?;
    writer.flush().map_err(|e| DispatchError::write(path, e))
}

/// Reads a report document previously written by [`write_report_file`].
pub fn load_report_file(path: impl AsRef<Path>) -> Result<Report, DispatchError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DispatchError::read(path, e))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Writes the header and the best agent's row as CRLF-terminated CSV.
fn write_top_agent_records<W: Write>(
    id: &str,
    metrics: &AgentMetrics,
    writer: W,
) -> csv::Result<()> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(&[
        id.to_string(),
        metrics.packages_delivered.to_string(),
        // Debug keeps the fraction on whole values ("12.0")
        format!("{:?}", metrics.total_distance),
        format!("{:?}", metrics.efficiency),
    ])?;

    wtr.flush()?;
    Ok(())
}

/// Writes the header and the best agent's row.
///
/// Fails with [`DispatchError::NoBestAgent`] before writing anything if
/// no agent delivered a package.
pub fn write_top_agent<W: Write>(report: &Report, writer: W) -> Result<(), DispatchError> {
    let (id, metrics) = report.best().ok_or(DispatchError::NoBestAgent)?;
    Ok(write_top_agent_records(id, metrics, writer)?)
}

/// Writes the top-performer CSV to `path`.
///
/// The file is not created when there is no best agent.
pub fn write_top_agent_file(report: &Report, path: impl AsRef<Path>) -> Result<(), DispatchError> {
    let path = path.as_ref();
    let (id, metrics) = report.best().ok_or(DispatchError::NoBestAgent)?;

    let file = File::create(path).map_err(|e| DispatchError::write(path, e))?;
    write_top_agent_records(id, metrics, BufWriter::new(file))
        .map_err(|e| DispatchError::write(path, e.into()))
}

/// Prints the mid-run join banner.
pub fn write_injection_banner<W: Write>(mut out: W, injection: &Injection) -> io::Result<()> {
    writeln!(
        out,
        "\n📢 New agent {} joined mid-day at {}\n",
        injection.agent_id, injection.position
    )
}

/// Prints every route trace, agent by agent in stats order.
pub fn write_routes<W: Write>(mut out: W, stats: &DeliveryStats) -> io::Result<()> {
    writeln!(out, "\n📦 DELIVERY ROUTES (ASCII)\n")?;
    for (agent, s) in stats.iter() {
        for route in &s.routes {
            writeln!(out, "{}: {}", agent, route)?;
        }
    }
    Ok(())
}

/// Prints the completion banner naming the best agent.
pub fn write_completion_banner<W: Write>(mut out: W, report: &Report) -> io::Result<()> {
    writeln!(out, "\n✅ Simulation Complete")?;
    writeln!(out, "🏆 Best Agent: {}", report.best_agent().unwrap_or("None"))
}
