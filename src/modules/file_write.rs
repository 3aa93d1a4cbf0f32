use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::boundary::RunContext;
use crate::errors::SnareError;
use crate::models::{ModuleOutcome, Signal};

/// Writes uploaded bytes to the upload root joined with the unsanitized
/// filename taken from the first input line. The resolved destination is
/// the observable; a destination that would leave the run's disposable
/// tree entirely is recorded but not physically written.
pub async fn run(root: &str, ctx: &RunContext) -> Result<ModuleOutcome, SnareError> {
    let input = ctx.input_str().into_owned();
    let (filename, content) = match input.split_once('\n') {
        Some((name, rest)) => (name.trim_end_matches('\r').to_string(), rest.to_string()),
        None => (input, String::new()),
    };

    let upload_root = ctx.scratch.join(root);
    let resolved = lexical_join(&upload_root, &filename);

    if filename.is_empty() {
        return Ok(ModuleOutcome::new(
            "missing filename".to_string(),
            Signal::FileAt(resolved),
        ));
    }

    if resolved.starts_with(&ctx.scratch) {
        if let Some(parent) = resolved.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                return Ok(ModuleOutcome::inconclusive(format!(
                    "could not create upload directory: {}",
                    e
                )));
            }
        }
        if let Err(e) = tokio::fs::write(&resolved, content.as_bytes()).await {
            return Ok(ModuleOutcome::inconclusive(format!(
                "could not store upload: {}",
                e
            )));
        }
    } else {
        debug!(run_id = ctx.run_id, path = %resolved.display(), "Destination leaves the scratch tree, write withheld");
    }

    let raw_output = format!("stored {} bytes at {}", content.len(), resolved.display());
    Ok(ModuleOutcome::new(raw_output, Signal::FileAt(resolved)))
}

/// Resolve `..` and `.` lexically against `base` without touching the
/// filesystem, the way the flawed original resolves its join.
pub fn lexical_join(base: &Path, name: &str) -> PathBuf {
    let mut resolved = base.to_path_buf();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => {
                resolved = PathBuf::from(component.as_os_str().to_os_string());
            }
        }
    }
    resolved
}
