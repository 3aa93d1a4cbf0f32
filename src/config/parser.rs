use std::path::Path;

use tracing::warn;

use super::schema::CONFIG_SCHEMA;
use super::types::HarnessConfig;
use crate::errors::SnareError;

pub async fn parse_config(path: &Path) -> Result<HarnessConfig, SnareError> {
    if !path.exists() {
        return Err(SnareError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(SnareError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;

    // JSON Schema validation
    validate_schema(&yaml)?;

    // Parse into typed config
    let config: HarnessConfig = serde_yaml::from_value(yaml)?;

    // Semantic validation
    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), SnareError> {
    let json_str = serde_json::to_string(yaml)
        .map_err(|e| SnareError::Config(format!("Config conversion error: {}", e)))?;
    let json_value: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|e| SnareError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| SnareError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        let messages: Vec<String> = errors
            .map(|e| format!("{} at {}", e, e.instance_path))
            .collect();
        if !messages.is_empty() {
            // Warn but don't fail — schema validation is advisory for now
            for msg in &messages {
                warn!(validation_error = %msg, "Config schema warning");
            }
        }
    }

    Ok(())
}

fn validate_semantics(config: &HarnessConfig) -> Result<(), SnareError> {
    if let Some(runs) = &config.runs {
        if runs.max_concurrent == Some(0) {
            return Err(SnareError::Config(
                "runs.max_concurrent must be at least 1".into(),
            ));
        }
        if runs.timeout_secs == Some(0) {
            return Err(SnareError::Config(
                "runs.timeout_secs must be at least 1".into(),
            ));
        }
    }

    if let Some(secrets) = &config.secrets {
        if let Some(artifact) = &secrets.artifact {
            if artifact.is_empty() {
                return Err(SnareError::Config("secrets.artifact must not be empty".into()));
            }
        }
    }

    Ok(())
}
