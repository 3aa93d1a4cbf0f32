use crate::boundary::RunContext;
use crate::errors::SnareError;
use crate::models::{ModuleOutcome, Signal};

/// Serves the literal contents of the staged configuration artifact when
/// the input names it. Any other name gets the benign status banner the
/// endpoint was supposed to serve.
pub async fn run(artifact: &str, ctx: &RunContext) -> Result<ModuleOutcome, SnareError> {
    let requested = ctx.input_str().trim().to_string();

    if requested != artifact {
        return Ok(ModuleOutcome::new(
            "service healthy\n".to_string(),
            Signal::Output,
        ));
    }

    let staged = ctx.artifact_dir().join(artifact);
    let bytes = match tokio::fs::read(&staged).await {
        Ok(b) => b,
        Err(e) => {
            // The artifact should have been staged at acquire time; its
            // absence is an operational failure, not a benign response.
            return Ok(ModuleOutcome::inconclusive(format!(
                "staged artifact unreadable: {}",
                e
            )));
        }
    };

    Ok(ModuleOutcome::new(
        String::from_utf8_lossy(&bytes).into_owned(),
        Signal::Output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::IsolationBoundary;
    use crate::catalog::builtin_catalog;
    use crate::models::Signal;

    async fn context(input: &[u8]) -> (tempfile::TempDir, RunContext) {
        let root = tempfile::tempdir().unwrap();
        let boundary = IsolationBoundary::new(root.path().to_path_buf(), None);
        let registry = builtin_catalog().unwrap();
        let case = registry.lookup("secrets-env-file").unwrap();
        let ctx = boundary.acquire(1, case, input).await.unwrap();
        (root, ctx)
    }

    #[tokio::test]
    async fn test_naming_the_artifact_discloses_it_verbatim() {
        let (_root, ctx) = context(b"app-secrets.env").await;
        let outcome = run("app-secrets.env", &ctx).await.unwrap();
        let staged = tokio::fs::read(ctx.artifact_dir().join("app-secrets.env"))
            .await
            .unwrap();
        assert_eq!(outcome.raw_output.as_bytes(), &staged[..]);
        assert_eq!(outcome.signal, Signal::Output);
    }

    #[tokio::test]
    async fn test_other_names_get_the_banner() {
        let (_root, ctx) = context(b"version").await;
        let outcome = run("app-secrets.env", &ctx).await.unwrap();
        assert_eq!(outcome.raw_output, "service healthy\n");
    }

    #[tokio::test]
    async fn test_missing_staged_artifact_is_inconclusive() {
        let (_root, ctx) = context(b"app-secrets.env").await;
        tokio::fs::remove_file(ctx.artifact_dir().join("app-secrets.env"))
            .await
            .unwrap();
        let outcome = run("app-secrets.env", &ctx).await.unwrap();
        assert!(matches!(outcome.signal, Signal::Inconclusive(_)));
    }
}
