pub mod types;
pub mod parser;
pub mod schema;

pub use types::{
    CatalogConfig, HarnessConfig, ReportingConfig, RunsConfig, SecretsConfig, ServerConfig,
};
pub use parser::parse_config;
