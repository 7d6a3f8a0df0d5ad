//! Error types for WardenState

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type for WardenState operations
pub type Result<T> = std::result::Result<T, WardenError>;

/// Errors that can occur while loading, validating, or shipping a snapshot
///
/// An unsafe snapshot is not represented here; deadlock is a computed
/// result, not a failure.
#[derive(Debug, Error)]
pub enum WardenError {
    /// Snapshot file missing or unreadable
    #[error("Failed to read snapshot file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A token in the snapshot text is not a non-negative integer
    #[error("Line {line}: cannot parse '{token}' as a resource count")]
    Parse { line: usize, token: String },

    /// A data line encountered while no section marker is active
    #[error("Line {line}: data outside of any snapshot section")]
    Format { line: usize },

    /// Structurally or semantically invalid snapshot
    #[error("Invalid program snapshot: {0}")]
    Malformed(#[from] MalformedSnapshot),

    /// Worker pipe read or write failed
    #[error("Analysis worker transport failed: {0}")]
    Transport(#[source] io::Error),

    /// Request or response could not be encoded/decoded for the worker
    #[error("Analysis message codec failed: {0}")]
    Codec(#[from] serde_json::Error),

    /// The worker refused the snapshot it received off the wire
    #[error("Analysis worker rejected snapshot: {0}")]
    WorkerRejected(String),
}

/// Construction-time validation failures for [`Snapshot`](crate::model::Snapshot)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedSnapshot {
    /// No process rows at all
    #[error("no allocation data")]
    Empty,

    /// The available-resources vector has no columns
    #[error("available resources vector is empty")]
    NoResources,

    /// Maximum and allocation matrices disagree on process count
    #[error("maximum matrix has {maximum} rows, allocation matrix has {allocation}")]
    ProcessCountMismatch { maximum: usize, allocation: usize },

    /// A matrix row disagrees with the available vector on column count
    #[error("{matrix} matrix row {row} has {got} columns, expected {expected}")]
    RaggedRow {
        matrix: MatrixKind,
        row: usize,
        expected: usize,
        got: usize,
    },

    /// More units held than the declared maximum demand
    #[error("process {row} resource {col}: allocation {allocated} exceeds maximum {maximum}")]
    NegativeNeed {
        row: usize,
        col: usize,
        maximum: u64,
        allocated: u64,
    },
}

/// Which matrix a validation failure points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    Maximum,
    Allocation,
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixKind::Maximum => write!(f, "maximum"),
            MatrixKind::Allocation => write!(f, "allocation"),
        }
    }
}
