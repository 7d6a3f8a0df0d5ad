//! Same analysis, shipped through the pipe-connected worker
//!
//! Spawns one worker and runs a safe and a deadlocked snapshot through it
//! back to back.

use warden_state::{AnalysisWorker, AnalyzerConfig, SafetyResult, Snapshot};

fn main() {
    let safe = Snapshot::new(
        vec![3, 3, 2],
        vec![
            vec![7, 5, 3],
            vec![3, 2, 2],
            vec![9, 0, 2],
            vec![2, 2, 2],
            vec![4, 3, 3],
        ],
        vec![
            vec![0, 1, 0],
            vec![2, 0, 0],
            vec![3, 0, 2],
            vec![2, 1, 1],
            vec![0, 0, 2],
        ],
    );
    let stuck = Snapshot::new(
        vec![0, 0],
        vec![vec![2, 1], vec![1, 2]],
        vec![vec![1, 0], vec![0, 1]],
    );

    let (safe, stuck) = match (safe, stuck) {
        (Ok(safe), Ok(stuck)) => (safe, stuck),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("[worker] invalid snapshot: {}", e);
            std::process::exit(1);
        }
    };

    let worker = match AnalysisWorker::spawn(AnalyzerConfig::default()) {
        Ok(worker) => worker,
        Err(e) => {
            eprintln!("[worker] failed to spawn: {}", e);
            std::process::exit(1);
        }
    };

    for (label, snapshot) in [("textbook", &safe), ("starved", &stuck)] {
        match worker.analyze(snapshot) {
            Ok(SafetyResult::Safe { sequence }) => {
                println!("[worker] {}: safe, ordering {:?}", label, sequence);
            }
            Ok(SafetyResult::Unsafe { .. }) => {
                println!("[worker] {}: deadlocked", label);
            }
            Err(e) => {
                eprintln!("[worker] {}: transport failed: {}", label, e);
                std::process::exit(1);
            }
        }
    }

    worker.shutdown();
}
