use std::path::PathBuf;

/// Observable outcome channel a module hands to the oracle alongside its
/// raw output. Carries run observations only, never module internals, so
/// judgment stays valid if a module is reimplemented.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// The action completed; all evidence is in the raw output.
    Output,
    /// A file write resolved to this path.
    FileAt(PathBuf),
    /// The query returned rows with these key values.
    RowSet(Vec<String>),
    /// `accepted` bytes of input were stored into a buffer of `capacity` bytes.
    BufferWrite { capacity: usize, accepted: usize },
    /// Whether a token the run did not issue verified against the issuer secret.
    TokenRoundTrip { forged_accepted: bool },
    /// Identifiers minted by consecutive generator draws.
    IdentifierBatch(Vec<String>),
    /// The module could not perform its action for a reason unrelated to
    /// the vulnerability under test.
    Inconclusive(String),
}

/// What a vulnerability module returns to the dispatcher.
#[derive(Debug, Clone)]
pub struct ModuleOutcome {
    pub raw_output: String,
    pub signal: Signal,
}

impl ModuleOutcome {
    pub fn new(raw_output: impl Into<String>, signal: Signal) -> Self {
        Self {
            raw_output: raw_output.into(),
            signal,
        }
    }

    pub fn inconclusive(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            raw_output: String::new(),
            signal: Signal::Inconclusive(reason),
        }
    }
}
