pub mod commands;
pub mod list;
pub mod serve;
pub mod trigger;
pub mod validate;

pub use commands::{Cli, Commands};

use std::path::Path;

use crate::catalog::{load_catalog, CaseRegistry};
use crate::config::{parse_config, HarnessConfig};
use crate::errors::SnareError;

/// Resolve configuration and catalogue for a command: an explicit `--cases`
/// path wins over the configured one, and the builtin catalogue is the
/// fallback.
pub async fn load_harness(
    config_path: Option<&str>,
    cases_path: Option<&str>,
) -> Result<(HarnessConfig, CaseRegistry), SnareError> {
    let config = match config_path {
        Some(path) => parse_config(Path::new(path)).await?,
        None => HarnessConfig::default(),
    };

    let catalog_path = cases_path
        .map(str::to_string)
        .or_else(|| config.catalog_path());
    let registry = load_catalog(catalog_path.as_deref().map(Path::new)).await?;

    Ok((config, registry))
}
