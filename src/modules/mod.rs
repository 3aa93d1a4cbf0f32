pub mod buffer_copy;
pub mod code_eval;
pub mod command_injection;
pub mod file_write;
pub mod query_construction;
pub mod secret_disclosure;
pub mod token_issuance;
pub mod weak_random;

use crate::boundary::{IsolationBoundary, RunContext};
use crate::catalog::{TriggerSpec, VulnerabilityCase};
use crate::errors::SnareError;
use crate::models::ModuleOutcome;

/// Route a run to its class's module. Class/trigger compatibility is
/// validated at catalogue load, so a mismatch here is a harness defect.
pub async fn run(
    boundary: &IsolationBoundary,
    case: &VulnerabilityCase,
    ctx: &RunContext,
) -> Result<ModuleOutcome, SnareError> {
    match &case.trigger {
        TriggerSpec::ShellPrefix { prefix } => {
            command_injection::run(boundary, prefix, ctx).await
        }
        TriggerSpec::Expression => code_eval::run(ctx).await,
        TriggerSpec::StaticSecret { secret } => token_issuance::run(secret, ctx).await,
        TriggerSpec::UploadRoot { root } => file_write::run(root, ctx).await,
        TriggerSpec::QueryTemplate { template } => {
            query_construction::run(template, ctx).await
        }
        TriggerSpec::FixedBuffer { capacity } => buffer_copy::run(*capacity, ctx).await,
        TriggerSpec::NamedArtifact { artifact } => {
            secret_disclosure::run(artifact, ctx).await
        }
        TriggerSpec::ClockSeed { granularity_ms } => {
            weak_random::run(*granularity_ms, ctx).await
        }
    }
}
