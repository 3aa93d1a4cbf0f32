pub mod case;
pub mod loader;
pub mod schema;

pub use case::{IsolationPolicy, OraclePredicate, TriggerSpec, VulnClass, VulnerabilityCase};
pub use loader::{builtin_catalog, load_catalog, CaseRegistry};
