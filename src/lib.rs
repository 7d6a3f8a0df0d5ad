//! WardenState - Resource-allocation safety analysis
//!
//! This library decides whether a static snapshot of process resource
//! allocation is in a safe state: whether some ordering exists in which every
//! process can obtain its maximum demand, run to completion, and release what
//! it holds, without deadlock.
//!
//! # Architecture
//!
//! - **Snapshot**: the validated data model (available resources, maximum
//!   demand, current allocation, derived remaining need)
//! - **SafetyAnalyzer**: fixed-point scan producing a completion ordering or
//!   a deadlock verdict
//! - **Reader**: loads the snapshot text format into a validated `Snapshot`
//! - **AnalysisWorker**: ships a snapshot to a pipe-connected worker thread
//!   and the verdict back
//!
//! An unsafe snapshot is a successfully computed result, not an error; all
//! fallibility lives at the boundaries (I/O, parsing, validation, transport).

pub mod analyzer;
pub mod error;
pub mod model;
pub mod reader;
pub mod transport;

pub use analyzer::{AnalyzerConfig, SafetyAnalyzer, SafetyResult};
pub use error::{MalformedSnapshot, MatrixKind, Result, WardenError};
pub use model::{ResourceVector, Snapshot};
pub use reader::{parse_snapshot, read_snapshot};
pub use transport::AnalysisWorker;
