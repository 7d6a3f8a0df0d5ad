//! Safety analysis over a validated snapshot
//!
//! The analyzer runs the classic resource-allocation safety check: repeated
//! passes over the processes, finishing any whose remaining need fits in the
//! working pool and releasing its allocation back, until a pass finishes
//! nothing. All processes finished means the snapshot is safe.

use crate::model::{ResourceVector, Snapshot};
use serde::{Deserialize, Serialize};

/// Analyzer configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzerConfig {
    /// Keep the partial completion ordering when the snapshot is unsafe
    ///
    /// Off by default: an unsafe verdict normally discards the processes
    /// that happened to finish before the algorithm stalled.
    pub report_partial_on_unsafe: bool,
}

/// Outcome of one safety analysis
///
/// Serializable so it can cross the worker pipe unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyResult {
    /// Every process can run to completion in the given index order
    Safe { sequence: Vec<usize> },
    /// Some non-empty subset of processes can never proceed
    Unsafe { partial: Option<Vec<usize>> },
}

impl SafetyResult {
    /// True for a [`SafetyResult::Safe`] verdict
    pub fn is_safe(&self) -> bool {
        matches!(self, SafetyResult::Safe { .. })
    }
}

/// Runs the safety algorithm against a borrowed [`Snapshot`]
///
/// The snapshot is never mutated; each invocation owns a private working
/// copy of the available vector, so independent analyses can run on
/// separate workers without shared state.
#[derive(Debug, Clone, Default)]
pub struct SafetyAnalyzer {
    config: AnalyzerConfig,
}

impl SafetyAnalyzer {
    /// Analyzer with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzer with an explicit configuration
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Find a completion ordering for every process, or report a deadlock
    ///
    /// Processes are scanned in ascending index order within each pass and
    /// the lowest eligible index is admitted first, so the returned sequence
    /// is deterministic for a given snapshot. Each pass either finishes at
    /// least one process or ends the loop, so the scan terminates in at most
    /// P passes.
    pub fn find_safe_sequence(&self, snapshot: &Snapshot) -> SafetyResult {
        let processes = snapshot.process_count();
        let mut working: ResourceVector = snapshot.available().to_vec();
        let mut finished = vec![false; processes];
        let mut sequence = Vec::with_capacity(processes);

        loop {
            let mut newly_finished = 0;
            for p in 0..processes {
                if finished[p] || !fits(&snapshot.need()[p], &working) {
                    continue;
                }

                // p can obtain its full demand, run to completion, and
                // release everything it currently holds
                for (pool, &held) in working.iter_mut().zip(&snapshot.allocation()[p]) {
                    *pool += held;
                }
                finished[p] = true;
                sequence.push(p);
                newly_finished += 1;
            }

            // Fixed point: a full pass with no progress
            if newly_finished == 0 {
                break;
            }
        }

        if finished.iter().all(|&done| done) {
            SafetyResult::Safe { sequence }
        } else if self.config.report_partial_on_unsafe {
            SafetyResult::Unsafe {
                partial: Some(sequence),
            }
        } else {
            SafetyResult::Unsafe { partial: None }
        }
    }
}

/// True when every element of `need` is covered by `available`
#[inline]
fn fits(need: &[u64], available: &[u64]) -> bool {
    need.iter().zip(available).all(|(&n, &a)| n <= a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Snapshot;

    fn textbook() -> Snapshot {
        Snapshot::new(
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
        )
        .unwrap()
    }

    fn deadlocked() -> Snapshot {
        // Nothing available and every process still needs something
        Snapshot::new(
            vec![0, 0],
            vec![vec![2, 1], vec![1, 2]],
            vec![vec![1, 0], vec![0, 1]],
        )
        .unwrap()
    }

    // Replay the sequence against a fresh pool, asserting the need fits at
    // every step
    fn assert_sequence_is_valid(snapshot: &Snapshot, sequence: &[usize]) {
        assert_eq!(sequence.len(), snapshot.process_count());
        let mut seen = vec![false; snapshot.process_count()];
        let mut pool = snapshot.available().to_vec();
        for &p in sequence {
            assert!(!seen[p], "process {p} appears twice");
            seen[p] = true;
            for (r, (&needed, &avail)) in
                snapshot.need()[p].iter().zip(&pool).enumerate()
            {
                assert!(
                    needed <= avail,
                    "process {p} needs {needed} of resource {r} but only {avail} available"
                );
            }
            for (slot, &held) in pool.iter_mut().zip(&snapshot.allocation()[p]) {
                *slot += held;
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn test_textbook_instance_is_safe() {
        let snapshot = textbook();
        let result = SafetyAnalyzer::new().find_safe_sequence(&snapshot);

        // Lowest-index-first tie-break makes this exact ordering canonical
        assert_eq!(
            result,
            SafetyResult::Safe {
                sequence: vec![1, 3, 4, 0, 2],
            }
        );
    }

    #[test]
    fn test_safe_sequence_replays_cleanly() {
        let snapshot = textbook();
        match SafetyAnalyzer::new().find_safe_sequence(&snapshot) {
            SafetyResult::Safe { sequence } => assert_sequence_is_valid(&snapshot, &sequence),
            other => panic!("expected a safe verdict, got {other:?}"),
        }
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let snapshot = textbook();
        let analyzer = SafetyAnalyzer::new();
        let first = analyzer.find_safe_sequence(&snapshot);
        let second = analyzer.find_safe_sequence(&snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_snapshot_is_untouched_by_analysis() {
        let snapshot = textbook();
        let before = snapshot.clone();
        let _ = SafetyAnalyzer::new().find_safe_sequence(&snapshot);
        assert_eq!(snapshot, before);
    }

    #[test]
    fn test_deadlock_discards_partial_by_default() {
        let result = SafetyAnalyzer::new().find_safe_sequence(&deadlocked());
        assert_eq!(result, SafetyResult::Unsafe { partial: None });
        assert!(!result.is_safe());
    }

    #[test]
    fn test_deadlock_reports_partial_when_configured() {
        // Process 0 can finish, then 1 and 2 starve each other
        let snapshot = Snapshot::new(
            vec![1, 0],
            vec![vec![1, 0], vec![3, 1], vec![1, 3]],
            vec![vec![0, 0], vec![1, 0], vec![0, 1]],
        )
        .unwrap();

        let analyzer = SafetyAnalyzer::with_config(AnalyzerConfig {
            report_partial_on_unsafe: true,
        });
        assert_eq!(
            analyzer.find_safe_sequence(&snapshot),
            SafetyResult::Unsafe {
                partial: Some(vec![0]),
            }
        );
    }

    #[test]
    fn test_zero_need_process_finishes_in_first_pass() {
        // Process 1 already holds its full maximum; process 0 must wait
        // for its release
        let snapshot = Snapshot::new(
            vec![0, 0],
            vec![vec![2, 2], vec![2, 2]],
            vec![vec![0, 0], vec![2, 2]],
        )
        .unwrap();

        match SafetyAnalyzer::new().find_safe_sequence(&snapshot) {
            SafetyResult::Safe { sequence } => assert_eq!(sequence, vec![1, 0]),
            other => panic!("expected a safe verdict, got {other:?}"),
        }
    }

    #[test]
    fn test_single_process_snapshot() {
        let snapshot =
            Snapshot::new(vec![1], vec![vec![1]], vec![vec![0]]).unwrap();
        assert_eq!(
            SafetyAnalyzer::new().find_safe_sequence(&snapshot),
            SafetyResult::Safe {
                sequence: vec![0],
            }
        );
    }

    #[test]
    fn test_result_survives_serde_round_trip() {
        let result = SafetyResult::Safe {
            sequence: vec![1, 3, 4, 0, 2],
        };
        let encoded = serde_json::to_string(&result).unwrap();
        let decoded: SafetyResult = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, result);
    }
}
