use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::boundary::RunContext;
use crate::errors::SnareError;
use crate::models::{ModuleOutcome, Signal};

const MAX_DRAWS: usize = 16;

/// Mints identifiers from a generator reseeded with wall-clock time before
/// every draw. The input selects how many identifiers to mint; draws that
/// land in the same clock granule repeat each other.
pub async fn run(granularity_ms: u64, ctx: &RunContext) -> Result<ModuleOutcome, SnareError> {
    let draws = ctx
        .input_str()
        .trim()
        .parse::<usize>()
        .unwrap_or(1)
        .clamp(1, MAX_DRAWS);

    let mut identifiers = Vec::with_capacity(draws);
    for _ in 0..draws {
        let seed = clock_seed(granularity_ms)?;
        let mut rng = StdRng::seed_from_u64(seed);
        identifiers.push(format!("{:016x}", rng.gen::<u64>()));
    }

    let raw_output = identifiers.join("\n");
    Ok(ModuleOutcome::new(
        raw_output,
        Signal::IdentifierBatch(identifiers),
    ))
}

fn clock_seed(granularity_ms: u64) -> Result<u64, SnareError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| SnareError::Internal(format!("clock before epoch: {}", e)))?;
    Ok(now.as_millis() as u64 / granularity_ms.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::catalog::IsolationPolicy;

    fn context(input: &[u8]) -> RunContext {
        RunContext {
            run_id: 1,
            case_id: "weak-random-session-id".into(),
            scratch: std::env::temp_dir(),
            started_at: Utc::now(),
            input: input.to_vec(),
            policy: IsolationPolicy::None,
        }
    }

    #[tokio::test]
    async fn test_same_tick_draws_collide() {
        // A one-hour granule makes both draws land in the same tick
        let outcome = run(3_600_000, &context(b"2")).await.unwrap();
        let Signal::IdentifierBatch(ids) = &outcome.signal else {
            panic!("expected IdentifierBatch signal");
        };
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_single_draw_exhibits_no_collision() {
        let outcome = run(1000, &context(b"")).await.unwrap();
        let Signal::IdentifierBatch(ids) = &outcome.signal else {
            panic!("expected IdentifierBatch signal");
        };
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn test_draw_count_is_clamped() {
        let outcome = run(3_600_000, &context(b"9999")).await.unwrap();
        let Signal::IdentifierBatch(ids) = &outcome.signal else {
            panic!("expected IdentifierBatch signal");
        };
        assert_eq!(ids.len(), MAX_DRAWS);
    }

    #[test]
    fn test_seed_is_quantized_by_granularity() {
        let coarse = clock_seed(3_600_000).unwrap();
        let coarse_again = clock_seed(3_600_000).unwrap();
        assert_eq!(coarse, coarse_again);
    }
}
