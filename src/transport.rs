//! Pipe-backed analysis worker
//!
//! Ships a snapshot to a worker thread over an OS pipe and the verdict back
//! over a second one. Each frame is a little-endian u32 length prefix
//! followed by a JSON body. The request body carries the three raw
//! structures (available, maximum, allocation); the worker rebuilds a
//! validated [`Snapshot`] from them before analyzing, so a truncated or
//! reordered frame surfaces as a typed rejection instead of a silently
//! corrupted matrix.

use crate::analyzer::{AnalyzerConfig, SafetyAnalyzer, SafetyResult};
use crate::error::{Result, WardenError};
use crate::model::{ResourceVector, Snapshot};
use rustix::fd::OwnedFd;
use rustix::io::{read, write};
use rustix::pipe::pipe;
use serde::{Deserialize, Serialize};
use std::io;
use std::thread::JoinHandle;

/// Raw snapshot data as it crosses the pipe
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotRequest {
    available: ResourceVector,
    maximum: Vec<ResourceVector>,
    allocation: Vec<ResourceVector>,
}

/// Worker reply: a verdict, or the far side's validation error text
#[derive(Debug, Serialize, Deserialize)]
enum WorkerResponse {
    Verdict(SafetyResult),
    Rejected(String),
}

/// A worker thread connected by a pair of pipes
///
/// One worker handles any number of sequential request/response exchanges.
/// Dropping the handle closes the request pipe, which ends the worker loop,
/// and then joins the thread.
pub struct AnalysisWorker {
    request_tx: Option<OwnedFd>,
    response_rx: OwnedFd,
    handle: Option<JoinHandle<()>>,
}

impl AnalysisWorker {
    /// Spawn a worker with the given analyzer configuration
    pub fn spawn(config: AnalyzerConfig) -> Result<Self> {
        let (request_rx, request_tx) =
            pipe().map_err(|e| WardenError::Transport(e.into()))?;
        let (response_rx, response_tx) =
            pipe().map_err(|e| WardenError::Transport(e.into()))?;

        let handle = std::thread::spawn(move || worker_loop(request_rx, response_tx, config));

        Ok(Self {
            request_tx: Some(request_tx),
            response_rx,
            handle: Some(handle),
        })
    }

    /// Ship a snapshot to the worker and block for its verdict
    pub fn analyze(&self, snapshot: &Snapshot) -> Result<SafetyResult> {
        let request_tx = self.request_tx.as_ref().ok_or_else(|| {
            WardenError::Transport(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "worker is shut down",
            ))
        })?;

        let request = SnapshotRequest {
            available: snapshot.available().to_vec(),
            maximum: snapshot.maximum().to_vec(),
            allocation: snapshot.allocation().to_vec(),
        };
        write_frame(request_tx, &serde_json::to_vec(&request)?)?;

        let body = read_frame(&self.response_rx)?.ok_or_else(|| {
            WardenError::Transport(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "worker closed the response pipe",
            ))
        })?;

        match serde_json::from_slice(&body)? {
            WorkerResponse::Verdict(result) => Ok(result),
            WorkerResponse::Rejected(cause) => Err(WardenError::WorkerRejected(cause)),
        }
    }

    /// Shut the worker down and wait for it to exit
    pub fn shutdown(self) {
        // Drop does the work: close the request pipe, join the thread
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        // Closing the request pipe is the shutdown signal
        self.request_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop(request_rx: OwnedFd, response_tx: OwnedFd, config: AnalyzerConfig) {
    let analyzer = SafetyAnalyzer::with_config(config);

    loop {
        let body = match read_frame(&request_rx) {
            Ok(Some(body)) => body,
            // Clean EOF or a dead pipe both mean the requester is gone
            Ok(None) | Err(_) => break,
        };

        let response = match decode_request(&body) {
            Ok(snapshot) => WorkerResponse::Verdict(analyzer.find_safe_sequence(&snapshot)),
            Err(err) => WorkerResponse::Rejected(err.to_string()),
        };

        let encoded = match serde_json::to_vec(&response) {
            Ok(encoded) => encoded,
            Err(_) => break,
        };
        if write_frame(&response_tx, &encoded).is_err() {
            break;
        }
    }
}

/// Rebuild a validated snapshot from the wire fields
fn decode_request(body: &[u8]) -> Result<Snapshot> {
    let request: SnapshotRequest = serde_json::from_slice(body)?;
    Snapshot::new(request.available, request.maximum, request.allocation)
}

fn write_frame(fd: &OwnedFd, body: &[u8]) -> Result<()> {
    let len = u32::try_from(body.len()).map_err(|_| {
        WardenError::Transport(io::Error::new(
            io::ErrorKind::InvalidInput,
            "frame body too large",
        ))
    })?;
    write_all(fd, &len.to_le_bytes())?;
    write_all(fd, body)
}

fn write_all(fd: &OwnedFd, mut buf: &[u8]) -> Result<()> {
    while !buf.is_empty() {
        let n = write(fd, buf).map_err(|e| WardenError::Transport(e.into()))?;
        if n == 0 {
            return Err(WardenError::Transport(io::Error::new(
                io::ErrorKind::WriteZero,
                "pipe refused further bytes",
            )));
        }
        buf = &buf[n..];
    }
    Ok(())
}

/// Read one frame; `None` means a clean EOF at a frame boundary
fn read_frame(fd: &OwnedFd) -> Result<Option<Vec<u8>>> {
    let mut header = [0u8; 4];
    match fill(fd, &mut header)? {
        0 => return Ok(None),
        4 => {}
        _ => return Err(mid_frame_eof()),
    }

    let len = u32::from_le_bytes(header) as usize;
    let mut body = vec![0u8; len];
    if fill(fd, &mut body)? != len {
        return Err(mid_frame_eof());
    }
    Ok(Some(body))
}

/// Fill `buf` from the pipe, stopping early only at EOF
fn fill(fd: &OwnedFd, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = read(fd, &mut buf[filled..]).map_err(|e| WardenError::Transport(e.into()))?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

fn mid_frame_eof() -> WardenError {
    WardenError::Transport(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "pipe closed mid-frame",
    ))
}
