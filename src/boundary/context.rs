use std::borrow::Cow;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::catalog::IsolationPolicy;

/// Disposable execution context for one run. Owned exclusively by the
/// dispatcher for the run's duration; the scratch tree is deleted
/// unconditionally at run end.
#[derive(Debug)]
pub struct RunContext {
    pub run_id: u64,
    pub case_id: String,
    /// Disposable filesystem root, exclusive to this run.
    pub scratch: PathBuf,
    pub started_at: DateTime<Utc>,
    /// Attacker-supplied payload for this run.
    pub input: Vec<u8>,
    pub policy: IsolationPolicy,
}

impl RunContext {
    /// Working directory for subprocesses and module file effects. Kept
    /// empty at acquire time so intended command output is predictable.
    pub fn work_dir(&self) -> PathBuf {
        self.scratch.join("work")
    }

    /// Staged run state: marker file and artifact copies.
    pub fn state_dir(&self) -> PathBuf {
        self.scratch.join("state")
    }

    pub fn marker_path(&self) -> PathBuf {
        self.state_dir().join("marker")
    }

    /// Sentinel planted in the marker file. Leaking it into run output
    /// proves a read beyond the intended operation.
    pub fn marker_sentinel(&self) -> String {
        format!("SNARE-MARK-{}", self.run_id)
    }

    pub fn artifact_dir(&self) -> PathBuf {
        self.state_dir().join("config")
    }

    pub fn input_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.input)
    }
}
