use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::errors::SnareError;

/// Observable metadata for one in-flight run.
#[derive(Debug, Clone)]
pub struct InFlightRun {
    pub run_id: u64,
    pub case_id: String,
    pub started_at: DateTime<Utc>,
}

struct Bookkeeping {
    next_id: u64,
    active: HashSet<u64>,
}

/// Tracks concurrently in-flight runs: assigns monotonic run ids, enforces
/// the concurrency ceiling, and answers "how many runs are in flight".
/// Only the begin/end bookkeeping is serialized; run execution is not.
pub struct RunRegistry {
    ceiling: usize,
    bookkeeping: Mutex<Bookkeeping>,
    in_flight: DashMap<u64, InFlightRun>,
}

impl RunRegistry {
    pub fn new(ceiling: usize) -> Self {
        Self {
            ceiling,
            bookkeeping: Mutex::new(Bookkeeping {
                next_id: 1,
                active: HashSet::new(),
            }),
            in_flight: DashMap::new(),
        }
    }

    /// Allocate a run id, rejecting with `Overloaded` once the ceiling is
    /// reached. No resources are allocated on rejection.
    pub fn begin(&self, case_id: &str) -> Result<u64, SnareError> {
        let run_id = {
            let mut book = self.bookkeeping.lock().unwrap();
            if book.active.len() >= self.ceiling {
                return Err(SnareError::Overloaded(format!(
                    "{} runs in flight (ceiling {})",
                    book.active.len(),
                    self.ceiling
                )));
            }
            let run_id = book.next_id;
            book.next_id += 1;
            book.active.insert(run_id);
            run_id
        };

        self.in_flight.insert(
            run_id,
            InFlightRun {
                run_id,
                case_id: case_id.to_string(),
                started_at: Utc::now(),
            },
        );
        debug!(run_id, case_id, "Run begun");
        Ok(run_id)
    }

    pub fn end(&self, run_id: u64) {
        self.in_flight.remove(&run_id);
        let mut book = self.bookkeeping.lock().unwrap();
        book.active.remove(&run_id);
        debug!(run_id, "Run ended");
    }

    pub fn in_flight(&self) -> usize {
        self.bookkeeping.lock().unwrap().active.len()
    }

    pub fn snapshot(&self) -> Vec<InFlightRun> {
        let mut runs: Vec<InFlightRun> =
            self.in_flight.iter().map(|e| e.value().clone()).collect();
        runs.sort_by_key(|r| r.run_id);
        runs
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let registry = RunRegistry::new(10);
        let a = registry.begin("case-a").unwrap();
        let b = registry.begin("case-b").unwrap();
        assert!(b > a);
    }

    #[test]
    fn test_ceiling_rejects_with_overloaded() {
        let registry = RunRegistry::new(2);
        registry.begin("a").unwrap();
        registry.begin("b").unwrap();
        let err = registry.begin("c").unwrap_err();
        assert!(matches!(err, SnareError::Overloaded(_)));
        assert_eq!(registry.in_flight(), 2);
    }

    #[test]
    fn test_end_frees_a_slot() {
        let registry = RunRegistry::new(1);
        let id = registry.begin("a").unwrap();
        assert!(registry.begin("b").is_err());
        registry.end(id);
        assert!(registry.begin("b").is_ok());
    }

    #[test]
    fn test_ids_not_reused_after_end() {
        let registry = RunRegistry::new(1);
        let a = registry.begin("a").unwrap();
        registry.end(a);
        let b = registry.begin("b").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_snapshot_reflects_in_flight_runs() {
        let registry = RunRegistry::new(4);
        let a = registry.begin("case-a").unwrap();
        let _b = registry.begin("case-b").unwrap();
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].run_id, a);
        assert_eq!(snapshot[0].case_id, "case-a");

        registry.end(a);
        assert_eq!(registry.snapshot().len(), 1);
    }

    #[test]
    fn test_concurrent_begin_end_is_consistent() {
        use std::sync::Arc;
        let registry = Arc::new(RunRegistry::new(64));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    let id = registry.begin("case").unwrap();
                    registry.end(id);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(registry.in_flight(), 0);
        assert!(registry.snapshot().is_empty());
    }
}
