//! Program snapshot text loader
//!
//! The snapshot format has three sections, each introduced by a marker line
//! and contiguous, in any order:
//!
//! ```text
//! // Maximum Matrix
//! 7 5 3
//! 3 2 2
//!
//! // Allocation Matrix
//! 0 1 0
//! 2 0 0
//!
//! // Available Resources
//! 3 3 2
//! ```
//!
//! Rows are whitespace-separated non-negative integers; blank lines are
//! ignored everywhere. Parse and format errors carry 1-based line numbers;
//! structural problems (ragged rows, missing sections) surface from
//! [`Snapshot::new`] once the whole file has been read.

use crate::error::{Result, WardenError};
use crate::model::{ResourceVector, Snapshot};
use std::fs;
use std::path::Path;

const MARKER_ALLOCATION: &str = "// Allocation Matrix";
const MARKER_MAXIMUM: &str = "// Maximum Matrix";
const MARKER_AVAILABLE: &str = "// Available Resources";

#[derive(Clone, Copy)]
enum Section {
    None,
    Allocation,
    Maximum,
    Available,
}

/// Read and validate a snapshot from a file
pub fn read_snapshot(path: impl AsRef<Path>) -> Result<Snapshot> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| WardenError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_snapshot(&text)
}

/// Parse and validate a snapshot from text
pub fn parse_snapshot(text: &str) -> Result<Snapshot> {
    let mut section = Section::None;
    let mut available: ResourceVector = Vec::new();
    let mut maximum: Vec<ResourceVector> = Vec::new();
    let mut allocation: Vec<ResourceVector> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let line_no = index + 1;

        if line.is_empty() {
            continue;
        }

        match line {
            MARKER_ALLOCATION => section = Section::Allocation,
            MARKER_MAXIMUM => section = Section::Maximum,
            MARKER_AVAILABLE => section = Section::Available,
            _ => match section {
                Section::Allocation => allocation.push(parse_row(line, line_no)?),
                Section::Maximum => maximum.push(parse_row(line, line_no)?),
                // A repeated available section replaces the previous vector
                Section::Available => available = parse_row(line, line_no)?,
                Section::None => return Err(WardenError::Format { line: line_no }),
            },
        }
    }

    Snapshot::new(available, maximum, allocation)
}

/// Whitespace-separated non-negative integers
fn parse_row(line: &str, line_no: usize) -> Result<ResourceVector> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<u64>().map_err(|_| WardenError::Parse {
                line: line_no,
                token: token.to_string(),
            })
        })
        .collect()
}
