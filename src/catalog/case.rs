use serde::{Deserialize, Serialize};

/// The eight hosted vulnerability classes. Each class maps to exactly one
/// module implementation; the registry rejects catalogues where a case's
/// trigger or oracle does not belong to its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VulnClass {
    CommandInjection,
    CodeEvaluation,
    TokenIssuance,
    FileWrite,
    QueryConstruction,
    BufferCopy,
    SecretDisclosure,
    WeakRandom,
}

impl VulnClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CommandInjection => "command_injection",
            Self::CodeEvaluation => "code_evaluation",
            Self::TokenIssuance => "token_issuance",
            Self::FileWrite => "file_write",
            Self::QueryConstruction => "query_construction",
            Self::BufferCopy => "buffer_copy",
            Self::SecretDisclosure => "secret_disclosure",
            Self::WeakRandom => "weak_random",
        }
    }
}

impl std::fmt::Display for VulnClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Required confinement level for a run of this case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IsolationPolicy {
    /// Scratch directory only.
    None,
    /// Scratch directory is the blast radius for all file effects.
    #[default]
    Filesystem,
    /// Scratch plus a constrained subprocess invocation context.
    Process,
}

impl IsolationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Filesystem => "filesystem",
            Self::Process => "process",
        }
    }
}

/// How untrusted input is interpolated into the underlying action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerSpec {
    /// Input appended verbatim to a fixed shell command prefix.
    ShellPrefix { prefix: String },
    /// Input evaluated as an expression by the scoped evaluator.
    Expression,
    /// Claims signed with a fixed, non-rotatable secret and no expiry.
    StaticSecret { secret: String },
    /// First input line joined unsanitized under this scratch-relative root.
    UploadRoot { root: String },
    /// Input substituted for `{input}` in the query template; the first
    /// selected column is the addressed identifier.
    QueryTemplate { template: String },
    /// Input copied into a buffer of this fixed capacity.
    FixedBuffer { capacity: usize },
    /// Input naming this artifact is answered with its literal bytes.
    NamedArtifact { artifact: String },
    /// Identifier generator reseeded from the wall clock at this granularity.
    ClockSeed { granularity_ms: u64 },
}

/// The observable signal that proves successful exploitation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OraclePredicate {
    /// Any non-empty output line not matched by `benign` is evidence of a
    /// command beyond the intended one.
    CommandResidue { benign: String },
    /// Evaluation output contains the run's planted marker sentinel.
    MarkerLeak,
    /// A token the run did not issue verified against the issuer secret.
    ForgedTokenAccepted,
    /// The resolved write destination escapes the intended upload root.
    PathEscape,
    /// The result set includes rows not addressable by the supplied identifier.
    RowsBeyondAddressed,
    /// Input longer than the buffer capacity was accepted untruncated.
    OverflowAccepted,
    /// The response body matches the staged artifact's exact bytes.
    VerbatimArtifact,
    /// Consecutive generator draws produced an identical identifier.
    RepeatedIdentifier,
}

/// A configured description of one vulnerability instance to be hosted and
/// judged. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnerabilityCase {
    pub id: String,
    pub class: VulnClass,
    pub description: String,
    pub trigger: TriggerSpec,
    pub oracle: OraclePredicate,
    #[serde(default)]
    pub isolation: IsolationPolicy,
}

impl VulnerabilityCase {
    /// Check that trigger and oracle belong to this case's class and that
    /// class-specific parameters are well formed.
    pub fn validate(&self) -> Result<(), String> {
        match (self.class, &self.trigger, &self.oracle) {
            (
                VulnClass::CommandInjection,
                TriggerSpec::ShellPrefix { .. },
                OraclePredicate::CommandResidue { benign },
            ) => regex::Regex::new(benign)
                .map(|_| ())
                .map_err(|e| format!("invalid benign residue pattern: {}", e)),
            (VulnClass::CodeEvaluation, TriggerSpec::Expression, OraclePredicate::MarkerLeak) => {
                Ok(())
            }
            (
                VulnClass::TokenIssuance,
                TriggerSpec::StaticSecret { secret },
                OraclePredicate::ForgedTokenAccepted,
            ) => {
                if secret.is_empty() {
                    Err("static secret must not be empty".into())
                } else {
                    Ok(())
                }
            }
            (
                VulnClass::FileWrite,
                TriggerSpec::UploadRoot { root },
                OraclePredicate::PathEscape,
            ) => {
                if root.is_empty() || std::path::Path::new(root).is_absolute() {
                    Err("upload root must be a non-empty scratch-relative path".into())
                } else {
                    Ok(())
                }
            }
            (
                VulnClass::QueryConstruction,
                TriggerSpec::QueryTemplate { template },
                OraclePredicate::RowsBeyondAddressed,
            ) => {
                if template.contains("{input}") {
                    Ok(())
                } else {
                    Err("query template is missing the {input} placeholder".into())
                }
            }
            (
                VulnClass::BufferCopy,
                TriggerSpec::FixedBuffer { capacity },
                OraclePredicate::OverflowAccepted,
            ) => {
                if *capacity == 0 {
                    Err("buffer capacity must be at least 1".into())
                } else {
                    Ok(())
                }
            }
            (
                VulnClass::SecretDisclosure,
                TriggerSpec::NamedArtifact { artifact },
                OraclePredicate::VerbatimArtifact,
            ) => {
                if artifact.is_empty() || artifact.contains('/') {
                    Err("artifact name must be a bare filename".into())
                } else {
                    Ok(())
                }
            }
            (
                VulnClass::WeakRandom,
                TriggerSpec::ClockSeed { granularity_ms },
                OraclePredicate::RepeatedIdentifier,
            ) => {
                if *granularity_ms == 0 {
                    Err("clock granularity must be at least 1ms".into())
                } else {
                    Ok(())
                }
            }
            (class, _, _) => Err(format!(
                "trigger/oracle are not compatible with class '{}'",
                class
            )),
        }
    }
}
