use data_encoding::BASE64URL_NOPAD;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::boundary::RunContext;
use crate::errors::SnareError;
use crate::models::{ModuleOutcome, Signal};

/// Issues claim tokens signed with a fixed, non-rotatable shared secret and
/// no expiry claim. An input that parses as a token is verified against the
/// same secret; acceptance of a token this run did not issue is the
/// observable outcome.
pub async fn run(secret: &str, ctx: &RunContext) -> Result<ModuleOutcome, SnareError> {
    let input = ctx.input_str().trim().to_string();

    if let Some(claims) = verify(secret, &input) {
        let raw_output = format!("accepted claims: {}", claims);
        return Ok(ModuleOutcome::new(
            raw_output,
            Signal::TokenRoundTrip {
                forged_accepted: true,
            },
        ));
    }

    let subject = if input.is_empty() { "anonymous" } else { &input };
    let claims = json!({ "sub": subject, "role": "user" }).to_string();
    let token = mint(secret, &claims);

    Ok(ModuleOutcome::new(
        token,
        Signal::TokenRoundTrip {
            forged_accepted: false,
        },
    ))
}

/// Token format: base64url(claims) "." hex(sha256(secret "." claims)).
/// The signature construction is as naive as the secret handling; both are
/// the hosted flaw.
pub fn mint(secret: &str, claims: &str) -> String {
    format!("{}.{}", BASE64URL_NOPAD.encode(claims.as_bytes()), sign(secret, claims))
}

fn sign(secret: &str, claims: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b".");
    hasher.update(claims.as_bytes());
    hex::encode(hasher.finalize())
}

fn verify(secret: &str, token: &str) -> Option<String> {
    let (encoded, signature) = token.split_once('.')?;
    let claims_bytes = BASE64URL_NOPAD.decode(encoded.as_bytes()).ok()?;
    let claims = String::from_utf8(claims_bytes).ok()?;
    if sign(secret, &claims) == signature {
        Some(claims)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::catalog::IsolationPolicy;

    fn context(input: &[u8]) -> RunContext {
        RunContext {
            run_id: 1,
            case_id: "token-static-secret".into(),
            scratch: std::env::temp_dir(),
            started_at: Utc::now(),
            input: input.to_vec(),
            policy: IsolationPolicy::None,
        }
    }

    const SECRET: &str = "s3cr3t-fixed-signing-key";

    #[tokio::test]
    async fn test_benign_input_is_issued_a_token() {
        let outcome = run(SECRET, &context(b"alice")).await.unwrap();
        assert_eq!(
            outcome.signal,
            Signal::TokenRoundTrip {
                forged_accepted: false
            }
        );
        // Issued token round-trips
        assert!(verify(SECRET, &outcome.raw_output).is_some());
    }

    #[tokio::test]
    async fn test_forged_admin_token_is_accepted() {
        let forged = mint(SECRET, r#"{"sub":"attacker","role":"admin"}"#);
        let outcome = run(SECRET, &context(forged.as_bytes())).await.unwrap();
        assert_eq!(
            outcome.signal,
            Signal::TokenRoundTrip {
                forged_accepted: true
            }
        );
        assert!(outcome.raw_output.contains("\"role\":\"admin\""));
    }

    #[tokio::test]
    async fn test_tampered_token_is_rejected() {
        let mut forged = mint(SECRET, r#"{"sub":"attacker","role":"admin"}"#);
        forged.pop();
        forged.push('0');
        let outcome = run(SECRET, &context(forged.as_bytes())).await.unwrap();
        assert_eq!(
            outcome.signal,
            Signal::TokenRoundTrip {
                forged_accepted: false
            }
        );
    }

    #[test]
    fn test_issued_claims_carry_no_expiry() {
        let claims = r#"{"sub":"alice","role":"user"}"#;
        let token = mint(SECRET, claims);
        let verified = verify(SECRET, &token).unwrap();
        assert!(!verified.contains("exp"));
    }
}
