use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use super::case::VulnerabilityCase;
use super::schema::CATALOG_SCHEMA;
use crate::errors::SnareError;

const BUILTIN_CATALOG: &str = include_str!("builtin.yaml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    cases: Vec<VulnerabilityCase>,
}

/// Read-only catalogue of vulnerability cases, shared by all runs for the
/// process lifetime.
#[derive(Debug)]
pub struct CaseRegistry {
    cases: Vec<VulnerabilityCase>,
    index: HashMap<String, usize>,
}

impl CaseRegistry {
    pub fn load(cases: Vec<VulnerabilityCase>) -> Result<Self, SnareError> {
        if cases.is_empty() {
            return Err(SnareError::Config("case catalogue is empty".into()));
        }

        let mut index = HashMap::new();
        for (i, case) in cases.iter().enumerate() {
            case.validate().map_err(|reason| {
                SnareError::Config(format!("case '{}': {}", case.id, reason))
            })?;
            if index.insert(case.id.clone(), i).is_some() {
                return Err(SnareError::Config(format!(
                    "duplicate case id '{}'",
                    case.id
                )));
            }
        }

        info!(cases = cases.len(), "Case catalogue loaded");
        Ok(Self { cases, index })
    }

    pub fn lookup(&self, id: &str) -> Option<&VulnerabilityCase> {
        self.index.get(id).map(|&i| &self.cases[i])
    }

    pub fn all(&self) -> &[VulnerabilityCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Load the catalogue from a YAML file, or the embedded builtin catalogue
/// when no path is configured.
pub async fn load_catalog(path: Option<&Path>) -> Result<CaseRegistry, SnareError> {
    let content = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SnareError::Config(format!(
                    "Case catalogue not found: {}",
                    p.display()
                )));
            }
            tokio::fs::read_to_string(p).await?
        }
        None => BUILTIN_CATALOG.to_string(),
    };
    parse_catalog(&content)
}

/// The embedded builtin catalogue. Infallible by construction; any error
/// here is a packaging defect.
pub fn builtin_catalog() -> Result<CaseRegistry, SnareError> {
    parse_catalog(BUILTIN_CATALOG)
}

fn parse_catalog(content: &str) -> Result<CaseRegistry, SnareError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    validate_schema(&yaml);
    let file: CatalogFile = serde_yaml::from_value(yaml)
        .map_err(|e| SnareError::Config(format!("malformed case catalogue: {}", e)))?;
    CaseRegistry::load(file.cases)
}

fn validate_schema(yaml: &serde_yaml::Value) {
    let json_value = match serde_json::to_string(yaml)
        .ok()
        .and_then(|s| serde_json::from_str::<serde_json::Value>(&s).ok())
    {
        Some(v) => v,
        None => return,
    };

    let compiled = match jsonschema::JSONSchema::compile(&CATALOG_SCHEMA) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Catalogue schema failed to compile");
            return;
        }
    };

    if let Err(errors) = compiled.validate(&json_value) {
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Catalogue schema warning");
        }
    };
}
