pub mod verdict;
pub mod signal;

pub use verdict::Verdict;
pub use signal::{ModuleOutcome, Signal};
