use std::path::Path;

use tokio::process::Command;

/// Build a constrained shell invocation: working directory pinned inside
/// the scratch tree, inherited environment dropped to a minimal PATH, and
/// the child reaped if the run is cancelled mid-flight.
pub fn constrained_shell(work_dir: &Path, line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(line)
        .current_dir(work_dir)
        .env_clear()
        .env("PATH", "/usr/local/bin:/usr/bin:/bin")
        .kill_on_drop(true);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shell_runs_in_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = constrained_shell(dir.path(), "pwd")
            .output()
            .await
            .unwrap();
        let cwd = String::from_utf8_lossy(&out.stdout);
        assert!(cwd.trim().ends_with(
            dir.path().file_name().unwrap().to_str().unwrap()
        ));
    }

    #[tokio::test]
    async fn test_environment_is_scrubbed() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("SNARE_CANARY_VAR", "leaked");
        let out = constrained_shell(dir.path(), "env")
            .output()
            .await
            .unwrap();
        let env = String::from_utf8_lossy(&out.stdout);
        assert!(!env.contains("SNARE_CANARY_VAR"));
        std::env::remove_var("SNARE_CANARY_VAR");
    }
}
