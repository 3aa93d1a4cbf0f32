use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HarnessConfig {
    pub server: Option<ServerConfig>,
    pub runs: Option<RunsConfig>,
    pub catalog: Option<CatalogConfig>,
    pub secrets: Option<SecretsConfig>,
    pub reporting: Option<ReportingConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ServerConfig {
    pub listen: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RunsConfig {
    /// Maximum concurrently in-flight runs before triggers are rejected.
    pub max_concurrent: Option<usize>,
    /// Absolute wall-clock budget per run, in seconds.
    pub timeout_secs: Option<u64>,
    /// Root under which per-run scratch directories are created.
    pub scratch_root: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CatalogConfig {
    /// Path to a YAML case catalogue. The embedded builtin catalogue is
    /// used when absent.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SecretsConfig {
    /// Filesystem path to the artifact the SecretDisclosure cases serve.
    /// Treated as opaque bytes.
    pub artifact: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ReportingConfig {
    /// Append-only JSONL destination for verdicts. Never read back.
    pub sink: Option<String>,
}

impl HarnessConfig {
    pub fn listen(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.listen.clone())
            .unwrap_or_else(|| "127.0.0.1:7730".to_string())
    }

    pub fn max_concurrent(&self) -> usize {
        self.runs
            .as_ref()
            .and_then(|r| r.max_concurrent)
            .unwrap_or(8)
    }

    pub fn timeout_secs(&self) -> u64 {
        self.runs.as_ref().and_then(|r| r.timeout_secs).unwrap_or(5)
    }

    pub fn scratch_root(&self) -> String {
        self.runs
            .as_ref()
            .and_then(|r| r.scratch_root.clone())
            .unwrap_or_else(|| std::env::temp_dir().join("snare").display().to_string())
    }

    pub fn catalog_path(&self) -> Option<String> {
        self.catalog.as_ref().and_then(|c| c.path.clone())
    }

    pub fn secret_artifact(&self) -> Option<String> {
        self.secrets.as_ref().and_then(|s| s.artifact.clone())
    }

    pub fn sink_path(&self) -> Option<String> {
        self.reporting.as_ref().and_then(|r| r.sink.clone())
    }
}
