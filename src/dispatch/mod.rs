use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::boundary::IsolationBoundary;
use crate::catalog::CaseRegistry;
use crate::config::HarnessConfig;
use crate::errors::SnareError;
use crate::models::Verdict;
use crate::modules;
use crate::oracle;
use crate::reporting::{JsonlSink, NullSink, VerdictSink};
use crate::runs::RunRegistry;

/// Routes an inbound trigger to the correct module inside a fresh isolation
/// boundary and guarantees the boundary is released exactly once, whatever
/// the module does.
pub struct Dispatcher {
    catalog: Arc<CaseRegistry>,
    boundary: IsolationBoundary,
    runs: Arc<RunRegistry>,
    sink: Arc<dyn VerdictSink>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        catalog: Arc<CaseRegistry>,
        boundary: IsolationBoundary,
        runs: Arc<RunRegistry>,
        sink: Arc<dyn VerdictSink>,
        timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            boundary,
            runs,
            sink,
            timeout,
        }
    }

    pub fn from_config(config: &HarnessConfig, catalog: CaseRegistry) -> Self {
        let boundary = IsolationBoundary::new(
            PathBuf::from(config.scratch_root()),
            config.secret_artifact().map(PathBuf::from),
        );
        let runs = Arc::new(RunRegistry::new(config.max_concurrent()));
        let sink: Arc<dyn VerdictSink> = match config.sink_path() {
            Some(path) => Arc::new(JsonlSink::new(std::path::Path::new(&path))),
            None => Arc::new(NullSink),
        };
        Self::new(
            Arc::new(catalog),
            boundary,
            runs,
            sink,
            Duration::from_secs(config.timeout_secs()),
        )
    }

    pub fn catalog(&self) -> &CaseRegistry {
        &self.catalog
    }

    pub fn runs(&self) -> &RunRegistry {
        &self.runs
    }

    /// Execute one trigger. Unknown case and a full run registry are
    /// rejections with nothing allocated; every other outcome, including
    /// module error and timeout, is recorded as a verdict.
    pub async fn trigger(&self, case_id: &str, input: &[u8]) -> Result<Verdict, SnareError> {
        let case = self
            .catalog
            .lookup(case_id)
            .ok_or_else(|| SnareError::UnknownCase(case_id.to_string()))?;

        let run_id = self.runs.begin(case_id)?;

        let ctx = match self.boundary.acquire(run_id, case, input).await {
            Ok(ctx) => ctx,
            Err(e) => {
                self.runs.end(run_id);
                return Err(e);
            }
        };

        let verdict = match tokio::time::timeout(
            self.timeout,
            modules::run(&self.boundary, case, &ctx),
        )
        .await
        {
            Ok(Ok(outcome)) => oracle::judge(case, &outcome, &ctx),
            Ok(Err(e)) => {
                warn!(run_id, case_id, error = %e, "Module failed outside its vulnerability");
                Verdict::inconclusive(run_id, case_id, &e.to_string())
            }
            Err(_) => {
                warn!(run_id, case_id, timeout_secs = self.timeout.as_secs(), "Run exceeded its wall-clock budget");
                Verdict::timeout(run_id, case_id)
            }
        };

        if let Err(e) = self.sink.record(&verdict).await {
            warn!(run_id, sink = self.sink.sink_name(), error = %e, "Failed to emit verdict");
        }

        // Teardown strictly follows judgment; exactly once per run
        self.boundary.release(&ctx).await;
        self.runs.end(run_id);

        info!(
            run_id,
            case_id,
            triggered = verdict.triggered,
            "Run judged"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_catalog;

    fn dispatcher(root: &std::path::Path, ceiling: usize, timeout: Duration) -> Dispatcher {
        Dispatcher::new(
            Arc::new(builtin_catalog().unwrap()),
            IsolationBoundary::new(root.to_path_buf(), None),
            Arc::new(RunRegistry::new(ceiling)),
            Arc::new(NullSink),
            timeout,
        )
    }

    fn scratch_entries(root: &std::path::Path) -> usize {
        std::fs::read_dir(root)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_unknown_case_is_rejected_without_allocation() {
        let root = tempfile::tempdir().unwrap();
        let d = dispatcher(root.path(), 4, Duration::from_secs(5));
        let err = d.trigger("no-such-case", b"x").await.unwrap_err();
        assert!(matches!(err, SnareError::UnknownCase(_)));
        assert_eq!(d.runs().in_flight(), 0);
        assert_eq!(scratch_entries(root.path()), 0);
    }

    #[tokio::test]
    async fn test_successful_run_reclaims_scratch() {
        let root = tempfile::tempdir().unwrap();
        let d = dispatcher(root.path(), 4, Duration::from_secs(5));
        let verdict = d.trigger("buffer-config-copy", &[b'A'; 40]).await.unwrap();
        assert!(verdict.triggered);
        assert_eq!(d.runs().in_flight(), 0);
        assert_eq!(scratch_entries(root.path()), 0);
    }

    #[tokio::test]
    async fn test_timeout_records_verdict_and_reclaims_scratch() {
        let root = tempfile::tempdir().unwrap();
        let d = dispatcher(root.path(), 4, Duration::from_millis(300));
        let verdict = d
            .trigger("cmd-shell-listing", b"; sleep 30")
            .await
            .unwrap();
        assert!(!verdict.triggered);
        assert_eq!(verdict.oracle_note, "timeout");
        assert_eq!(d.runs().in_flight(), 0);
        assert_eq!(scratch_entries(root.path()), 0);
    }

    #[tokio::test]
    async fn test_ceiling_rejects_extra_trigger_while_run_in_flight() {
        let root = tempfile::tempdir().unwrap();
        let d = Arc::new(dispatcher(root.path(), 1, Duration::from_secs(5)));

        let slow = {
            let d = d.clone();
            tokio::spawn(async move { d.trigger("cmd-shell-listing", b"; sleep 2").await })
        };

        // Wait for the slow run to occupy the only slot
        while d.runs().in_flight() == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let err = d.trigger("buffer-config-copy", b"x").await.unwrap_err();
        assert!(matches!(err, SnareError::Overloaded(_)));

        slow.abort();
    }

    #[tokio::test]
    async fn test_verdicts_are_stable_across_repeated_triggers() {
        let root = tempfile::tempdir().unwrap();
        let d = dispatcher(root.path(), 4, Duration::from_secs(5));
        for _ in 0..3 {
            let verdict = d
                .trigger("query-user-lookup", b"' OR '1'='1")
                .await
                .unwrap();
            assert!(verdict.triggered);
        }
        for _ in 0..3 {
            let verdict = d.trigger("query-user-lookup", b"alice").await.unwrap();
            assert!(!verdict.triggered);
        }
    }
}
