//! Error types for the dispatch pipeline.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a dispatch run.
///
/// Nothing is recovered locally: every variant propagates to the caller.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Input document could not be opened or read
    #[error("Failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Document is not valid JSON or does not match the expected shape
    #[error("Malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A package references a warehouse that is not in the warehouse map
    #[error("Package {index} references unknown warehouse '{warehouse}'")]
    UnknownWarehouse { index: usize, warehouse: String },

    /// The injected agent id is already in the roster
    #[error("Agent '{0}' already exists in the roster")]
    DuplicateAgent(String),

    /// An agent id collides with the report's `best_agent` field
    #[error("Agent id '{0}' is reserved")]
    ReservedAgentId(String),

    /// No agent is available when a package needs assigning
    #[error("No agents available to assign package {0}")]
    EmptyRoster(usize),

    /// An output artifact could not be written
    #[error("Failed to write {path}: {source}")]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// CSV encoding of the top performer failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No agent delivered anything, so there is no top performer row
    #[error("No agent delivered a package; top performer is undefined")]
    NoBestAgent,
}

impl DispatchError {
    /// Creates a read error for `path`.
    pub fn read(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::ReadInput {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a write error for `path`.
    pub fn write(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::WriteOutput {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates an unknown-warehouse error.
    pub fn unknown_warehouse(index: usize, warehouse: impl Into<String>) -> Self {
        Self::UnknownWarehouse {
            index,
            warehouse: warehouse.into(),
        }
    }
}
