//! In-process analysis of the classic textbook snapshot
//!
//! Five processes, three resource types; builds the snapshot directly and
//! prints the completion ordering.

use warden_state::{SafetyAnalyzer, SafetyResult, Snapshot};

fn main() {
    let snapshot = match Snapshot::new(
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
    ) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("[textbook] invalid snapshot: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "[textbook] {} processes, {} resource types",
        snapshot.process_count(),
        snapshot.resource_count()
    );

    match SafetyAnalyzer::new().find_safe_sequence(&snapshot) {
        SafetyResult::Safe { sequence } => {
            println!("[textbook] safe, completion ordering: {:?}", sequence);
        }
        SafetyResult::Unsafe { .. } => {
            println!("[textbook] deadlocked");
        }
    }
}
