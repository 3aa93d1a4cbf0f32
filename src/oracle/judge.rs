use regex::Regex;

use crate::boundary::RunContext;
use crate::catalog::{OraclePredicate, TriggerSpec, VulnerabilityCase};
use crate::models::{ModuleOutcome, Signal, Verdict};

/// Apply the case's oracle predicate to the module's observable outcome and
/// residual boundary state. Judgment is a function of run data only, so a
/// reimplemented module keeps the same oracle.
pub fn judge(case: &VulnerabilityCase, outcome: &ModuleOutcome, ctx: &RunContext) -> Verdict {
    if let Signal::Inconclusive(reason) = &outcome.signal {
        return Verdict::inconclusive(ctx.run_id, &case.id, reason);
    }

    let (triggered, oracle_note) = match &case.oracle {
        OraclePredicate::CommandResidue { benign } => {
            judge_command_residue(benign, &outcome.raw_output)
        }
        OraclePredicate::MarkerLeak => judge_marker_leak(&outcome.raw_output, ctx),
        OraclePredicate::ForgedTokenAccepted => judge_forged_token(&outcome.signal),
        OraclePredicate::PathEscape => judge_path_escape(case, &outcome.signal, ctx),
        OraclePredicate::RowsBeyondAddressed => judge_row_set(&outcome.signal, ctx),
        OraclePredicate::OverflowAccepted => judge_overflow(&outcome.signal),
        OraclePredicate::VerbatimArtifact => judge_artifact(case, &outcome.raw_output, ctx),
        OraclePredicate::RepeatedIdentifier => judge_repeats(&outcome.signal),
    };

    Verdict::new(
        ctx.run_id,
        &case.id,
        triggered,
        outcome.raw_output.clone(),
        oracle_note,
    )
}

fn judge_command_residue(benign: &str, raw_output: &str) -> (bool, String) {
    let re = match Regex::new(benign) {
        Ok(re) => re,
        // Unreachable after load-time validation
        Err(e) => return (false, format!("inconclusive: benign pattern invalid: {}", e)),
    };

    for line in raw_output.lines() {
        let line = line.trim();
        if !line.is_empty() && !re.is_match(line) {
            return (
                true,
                format!("output line not explained by the intended command: {:?}", line),
            );
        }
    }
    (false, "all output explained by the intended command".into())
}

fn judge_marker_leak(raw_output: &str, ctx: &RunContext) -> (bool, String) {
    if raw_output.contains(&ctx.marker_sentinel()) {
        (
            true,
            "evaluation result contains the planted marker sentinel".into(),
        )
    } else {
        (
            false,
            "evaluation stayed within pure computation".into(),
        )
    }
}

fn judge_forged_token(signal: &Signal) -> (bool, String) {
    match signal {
        Signal::TokenRoundTrip {
            forged_accepted: true,
        } => (
            true,
            "a token this run did not issue verified against the fixed secret".into(),
        ),
        Signal::TokenRoundTrip {
            forged_accepted: false,
        } => (false, "no externally constructed token was accepted".into()),
        other => signal_mismatch(other),
    }
}

fn judge_path_escape(
    case: &VulnerabilityCase,
    signal: &Signal,
    ctx: &RunContext,
) -> (bool, String) {
    let root = match &case.trigger {
        TriggerSpec::UploadRoot { root } => ctx.scratch.join(root),
        // Unreachable after load-time validation
        _ => return (false, "inconclusive: case carries no upload root".into()),
    };
    match signal {
        Signal::FileAt(path) => {
            if path.starts_with(&root) {
                (
                    false,
                    format!("destination stayed under {}", root.display()),
                )
            } else {
                (
                    true,
                    format!(
                        "destination {} resolves outside the upload root",
                        path.display()
                    ),
                )
            }
        }
        other => signal_mismatch(other),
    }
}

fn judge_row_set(signal: &Signal, ctx: &RunContext) -> (bool, String) {
    let addressed = ctx.input_str().trim().to_string();
    match signal {
        Signal::RowSet(keys) => {
            let beyond = keys.iter().filter(|k| **k != addressed).count();
            if beyond > 0 {
                (
                    true,
                    format!(
                        "result set includes {} row(s) not addressed by the supplied identifier",
                        beyond
                    ),
                )
            } else {
                (
                    false,
                    "result set limited to the addressed identifier".into(),
                )
            }
        }
        other => signal_mismatch(other),
    }
}

fn judge_overflow(signal: &Signal) -> (bool, String) {
    match signal {
        Signal::BufferWrite { capacity, accepted } => {
            if accepted > capacity {
                (
                    true,
                    format!(
                        "{} bytes accepted into a {}-byte buffer without truncation or rejection",
                        accepted, capacity
                    ),
                )
            } else {
                (
                    false,
                    format!("{} bytes fit the {}-byte buffer", accepted, capacity),
                )
            }
        }
        other => signal_mismatch(other),
    }
}

fn judge_artifact(
    case: &VulnerabilityCase,
    raw_output: &str,
    ctx: &RunContext,
) -> (bool, String) {
    let artifact = match &case.trigger {
        TriggerSpec::NamedArtifact { artifact } => artifact,
        // Unreachable after load-time validation
        _ => return (false, "inconclusive: case names no artifact".into()),
    };
    let staged = match std::fs::read(ctx.artifact_dir().join(artifact)) {
        Ok(bytes) => bytes,
        Err(e) => {
            return (
                false,
                format!("inconclusive: staged artifact unavailable for judgment: {}", e),
            )
        }
    };
    if !raw_output.is_empty() && raw_output.as_bytes() == &staged[..] {
        (true, "response body matches the artifact's exact bytes".into())
    } else {
        (false, "response body differs from the artifact".into())
    }
}

fn judge_repeats(signal: &Signal) -> (bool, String) {
    match signal {
        Signal::IdentifierBatch(ids) => {
            let mut seen = std::collections::HashSet::new();
            for id in ids {
                if !seen.insert(id) {
                    return (
                        true,
                        format!("identifier {} was minted more than once", id),
                    );
                }
            }
            (
                false,
                format!("all {} identifier(s) distinct", ids.len()),
            )
        }
        other => signal_mismatch(other),
    }
}

fn signal_mismatch(signal: &Signal) -> (bool, String) {
    (
        false,
        format!(
            "inconclusive: signal {:?} does not belong to this case's oracle",
            signal
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::catalog::{builtin_catalog, IsolationPolicy};
    use crate::models::ModuleOutcome;

    fn context(input: &[u8]) -> RunContext {
        RunContext {
            run_id: 11,
            case_id: "test".into(),
            scratch: std::env::temp_dir().join("snare-judge-test"),
            started_at: Utc::now(),
            input: input.to_vec(),
            policy: IsolationPolicy::None,
        }
    }

    fn case(id: &str) -> VulnerabilityCase {
        builtin_catalog().unwrap().lookup(id).unwrap().clone()
    }

    #[test]
    fn test_command_residue_flags_injected_output() {
        let case = case("cmd-shell-listing");
        let ctx = context(b"; echo PWNED");
        let outcome = ModuleOutcome::new("PWNED\n", Signal::Output);
        let verdict = judge(&case, &outcome, &ctx);
        assert!(verdict.triggered);
        assert!(verdict.oracle_note.contains("PWNED"));
    }

    #[test]
    fn test_command_residue_accepts_intended_error_lines() {
        let case = case("cmd-shell-listing");
        let ctx = context(b"readme");
        let outcome = ModuleOutcome::new(
            "ls: cannot access 'readme': No such file or directory\n",
            Signal::Output,
        );
        assert!(!judge(&case, &outcome, &ctx).triggered);
    }

    #[test]
    fn test_marker_leak_detection() {
        let case = case("eval-expression");
        let ctx = context(b"read(\"state/marker\")");
        let leak = ModuleOutcome::new(ctx.marker_sentinel(), Signal::Output);
        assert!(judge(&case, &leak, &ctx).triggered);

        let pure = ModuleOutcome::new("4", Signal::Output);
        assert!(!judge(&case, &pure, &ctx).triggered);
    }

    #[test]
    fn test_row_set_beyond_addressed_identifier() {
        let case = case("query-user-lookup");
        let ctx = context(b"' OR '1'='1");
        let outcome = ModuleOutcome::new(
            "alice,a@x\nbob,b@x",
            Signal::RowSet(vec!["alice".into(), "bob".into()]),
        );
        assert!(judge(&case, &outcome, &ctx).triggered);

        let ctx = context(b"alice");
        let outcome = ModuleOutcome::new("alice,a@x", Signal::RowSet(vec!["alice".into()]));
        assert!(!judge(&case, &outcome, &ctx).triggered);
    }

    #[test]
    fn test_overflow_judgment_is_exact_at_capacity() {
        let case = case("buffer-config-copy");
        let ctx = context(&[b'A'; 33]);
        let over = ModuleOutcome::new(
            "",
            Signal::BufferWrite {
                capacity: 32,
                accepted: 33,
            },
        );
        assert!(judge(&case, &over, &ctx).triggered);

        let exact = ModuleOutcome::new(
            "",
            Signal::BufferWrite {
                capacity: 32,
                accepted: 32,
            },
        );
        assert!(!judge(&case, &exact, &ctx).triggered);
    }

    #[test]
    fn test_repeated_identifier_judgment() {
        let case = case("weak-random-session-id");
        let ctx = context(b"2");
        let dup = ModuleOutcome::new(
            "",
            Signal::IdentifierBatch(vec!["abc".into(), "abc".into()]),
        );
        assert!(judge(&case, &dup, &ctx).triggered);

        let distinct = ModuleOutcome::new(
            "",
            Signal::IdentifierBatch(vec!["abc".into(), "def".into()]),
        );
        assert!(!judge(&case, &distinct, &ctx).triggered);
    }

    #[test]
    fn test_inconclusive_signal_is_never_a_success() {
        let case = case("cmd-shell-listing");
        let ctx = context(b"; echo PWNED");
        let outcome = ModuleOutcome::inconclusive("spawn failed");
        let verdict = judge(&case, &outcome, &ctx);
        assert!(!verdict.triggered);
        assert!(verdict.oracle_note.starts_with("inconclusive:"));
    }

    #[test]
    fn test_forged_token_judgment() {
        let case = case("token-static-secret");
        let ctx = context(b"whatever");
        let accepted = ModuleOutcome::new(
            "claims",
            Signal::TokenRoundTrip {
                forged_accepted: true,
            },
        );
        assert!(judge(&case, &accepted, &ctx).triggered);
    }
}
