pub mod sink;

pub use sink::{JsonlSink, NullSink, VerdictSink};
