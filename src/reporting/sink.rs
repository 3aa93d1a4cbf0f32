use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::errors::SnareError;
use crate::models::Verdict;

/// Append-only destination for verdict records. The harness emits one
/// record per run and never reads the destination back.
#[async_trait]
pub trait VerdictSink: Send + Sync {
    async fn record(&self, verdict: &Verdict) -> Result<(), SnareError>;

    /// Sink name for logging
    fn sink_name(&self) -> &str;
}

/// One JSON object per line, appended to a file the harness does not own.
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl VerdictSink for JsonlSink {
    async fn record(&self, verdict: &Verdict) -> Result<(), SnareError> {
        let mut line = serde_json::to_string(verdict)?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| SnareError::Sink(format!("could not open sink: {}", e)))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| SnareError::Sink(format!("could not append verdict: {}", e)))?;
        Ok(())
    }

    fn sink_name(&self) -> &str {
        "jsonl"
    }
}

/// Discards verdicts. Used when no sink is configured and in tests.
pub struct NullSink;

#[async_trait]
impl VerdictSink for NullSink {
    async fn record(&self, _verdict: &Verdict) -> Result<(), SnareError> {
        Ok(())
    }

    fn sink_name(&self) -> &str {
        "null"
    }
}
