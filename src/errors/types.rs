use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnareError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown case: {0}")]
    UnknownCase(String),

    #[error("Module error: {0}")]
    Module(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Overloaded: {0}")]
    Overloaded(String),

    #[error("Boundary error: {0}")]
    Boundary(String),

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
