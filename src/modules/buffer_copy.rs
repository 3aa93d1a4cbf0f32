use crate::boundary::RunContext;
use crate::errors::SnareError;
use crate::models::{ModuleOutcome, Signal};

/// Copies the input into a fixed-capacity buffer with no bounds check:
/// oversized input is accepted whole, never truncated or rejected. The
/// accepted length is the observable; actual memory corruption is not
/// reproduced.
pub async fn run(capacity: usize, ctx: &RunContext) -> Result<ModuleOutcome, SnareError> {
    let mut buffer: Vec<u8> = Vec::with_capacity(capacity);
    buffer.extend_from_slice(&ctx.input);
    let accepted = buffer.len();

    let raw_output = format!(
        "copied {} bytes into {}-byte buffer",
        accepted, capacity
    );
    Ok(ModuleOutcome::new(
        raw_output,
        Signal::BufferWrite { capacity, accepted },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::catalog::IsolationPolicy;

    fn context(input: Vec<u8>) -> RunContext {
        RunContext {
            run_id: 1,
            case_id: "buffer-config-copy".into(),
            scratch: std::env::temp_dir(),
            started_at: Utc::now(),
            input,
            policy: IsolationPolicy::Process,
        }
    }

    #[tokio::test]
    async fn test_oversized_input_is_accepted_untruncated() {
        let outcome = run(32, &context(vec![b'A'; 33])).await.unwrap();
        assert_eq!(
            outcome.signal,
            Signal::BufferWrite {
                capacity: 32,
                accepted: 33
            }
        );
    }

    #[tokio::test]
    async fn test_fitting_input_stays_within_capacity() {
        let outcome = run(32, &context(vec![b'A'; 31])).await.unwrap();
        assert_eq!(
            outcome.signal,
            Signal::BufferWrite {
                capacity: 32,
                accepted: 31
            }
        );
    }
}
