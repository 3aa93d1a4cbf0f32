use super::types::SnareError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Fatal errors abort startup; everything else is converted into a
    /// verdict or a classified rejection at the dispatcher boundary.
    pub fatal: bool,
}

impl SnareError {
    /// Classify this error to determine its type and whether it may abort the process.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Fatal at load time
            SnareError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                fatal: true,
            },
            SnareError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                fatal: true,
            },

            // Per-run: rejected or recorded, never fatal
            SnareError::UnknownCase(_) => ErrorClassification {
                error_type: "UnknownCaseError",
                fatal: false,
            },
            SnareError::Overloaded(_) => ErrorClassification {
                error_type: "OverloadedError",
                fatal: false,
            },
            SnareError::Module(_) => ErrorClassification {
                error_type: "ModuleError",
                fatal: false,
            },
            SnareError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                fatal: false,
            },
            SnareError::Boundary(_) => ErrorClassification {
                error_type: "BoundaryError",
                fatal: false,
            },
            SnareError::Sink(_) => ErrorClassification {
                error_type: "SinkError",
                fatal: false,
            },

            // Ambient
            SnareError::Io(_) => ErrorClassification {
                error_type: "IoError",
                fatal: false,
            },
            SnareError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                fatal: false,
            },
            SnareError::Database(_) => ErrorClassification {
                error_type: "DatabaseError",
                fatal: false,
            },
            SnareError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                fatal: false,
            },
        }
    }
}
