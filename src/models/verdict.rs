use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The recorded, immutable outcome of one trigger run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub run_id: u64,
    pub case_id: String,
    /// Whether the case's exploit signature was observed.
    pub triggered: bool,
    /// Raw output produced by the module (command output, query rows,
    /// evaluator result, served bytes as lossy UTF-8).
    pub raw_output: String,
    /// Human-readable explanation of the match or mismatch.
    pub oracle_note: String,
    pub completed_at: DateTime<Utc>,
}

impl Verdict {
    pub fn new(
        run_id: u64,
        case_id: &str,
        triggered: bool,
        raw_output: String,
        oracle_note: String,
    ) -> Self {
        Self {
            run_id,
            case_id: case_id.to_string(),
            triggered,
            raw_output,
            oracle_note,
            completed_at: Utc::now(),
        }
    }

    /// Verdict for a run that exceeded its wall-clock budget.
    pub fn timeout(run_id: u64, case_id: &str) -> Self {
        Self::new(run_id, case_id, false, String::new(), "timeout".to_string())
    }

    /// Verdict for a module that could not execute its intended action for
    /// a reason unrelated to the vulnerability. Recorded as inconclusive,
    /// never as success.
    pub fn inconclusive(run_id: u64, case_id: &str, reason: &str) -> Self {
        Self::new(
            run_id,
            case_id,
            false,
            String::new(),
            format!("inconclusive: {}", reason),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_verdict_shape() {
        let v = Verdict::timeout(7, "cmd-injection-ls");
        assert!(!v.triggered);
        assert_eq!(v.oracle_note, "timeout");
        assert_eq!(v.run_id, 7);
    }

    #[test]
    fn test_inconclusive_never_triggered() {
        let v = Verdict::inconclusive(3, "file-write-upload", "permission denied");
        assert!(!v.triggered);
        assert!(v.oracle_note.starts_with("inconclusive:"));
    }

    #[test]
    fn test_verdict_serializes_required_fields() {
        let v = Verdict::new(1, "weak-random-token", true, "out".into(), "note".into());
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["run_id"], 1);
        assert_eq!(json["case_id"], "weak-random-token");
        assert_eq!(json["triggered"], true);
        assert_eq!(json["raw_output"], "out");
        assert_eq!(json["oracle_note"], "note");
    }
}
