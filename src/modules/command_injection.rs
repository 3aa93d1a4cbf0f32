use tracing::debug;

use crate::boundary::{IsolationBoundary, RunContext};
use crate::errors::SnareError;
use crate::models::{ModuleOutcome, Signal};

/// Builds a shell command line by concatenating the fixed prefix with the
/// unsanitized attacker input and executes it inside the boundary's
/// constrained subprocess context.
pub async fn run(
    boundary: &IsolationBoundary,
    prefix: &str,
    ctx: &RunContext,
) -> Result<ModuleOutcome, SnareError> {
    let line = format!("{}{}", prefix, ctx.input_str());
    debug!(run_id = ctx.run_id, command = %&line[..line.len().min(200)], "Executing in boundary");

    let output = match boundary.shell(ctx, &line).output().await {
        Ok(o) => o,
        Err(e) => {
            // Spawn failure has nothing to do with the injected input
            return Ok(ModuleOutcome::inconclusive(format!(
                "failed to spawn shell: {}",
                e
            )));
        }
    };

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(ModuleOutcome::new(combined, Signal::Output))
}
