pub mod types;
pub mod classification;

pub use types::SnareError;
pub use classification::ErrorClassification;
