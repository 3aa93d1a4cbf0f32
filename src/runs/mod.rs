pub mod registry;

pub use registry::{InFlightRun, RunRegistry};
