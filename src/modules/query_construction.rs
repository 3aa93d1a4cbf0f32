use rusqlite::Connection;

use crate::boundary::RunContext;
use crate::errors::SnareError;
use crate::models::{ModuleOutcome, Signal};

/// Sentinel rows seeded into every run's private store. Concurrent runs
/// each get their own in-memory connection, so injected rows can never be
/// observed across runs.
const SEED_ROWS: &str = "
CREATE TABLE users (id INTEGER PRIMARY KEY, username TEXT NOT NULL, email TEXT NOT NULL);
INSERT INTO users (username, email) VALUES ('alice', 'alice@example.com');
INSERT INTO users (username, email) VALUES ('bob', 'bob@example.com');
INSERT INTO users (username, email) VALUES ('carol', 'carol@example.com');
";

/// Builds the query by direct string concatenation of the input into the
/// fixed template and executes it against the run's seeded store. The first
/// selected column is the addressed identifier.
pub async fn run(template: &str, ctx: &RunContext) -> Result<ModuleOutcome, SnareError> {
    let conn = match Connection::open_in_memory() {
        Ok(c) => c,
        Err(e) => {
            return Ok(ModuleOutcome::inconclusive(format!(
                "could not open run store: {}",
                e
            )))
        }
    };
    if let Err(e) = conn.execute_batch(SEED_ROWS) {
        return Ok(ModuleOutcome::inconclusive(format!(
            "could not seed run store: {}",
            e
        )));
    }

    let query = template.replace("{input}", &ctx.input_str());

    let rows = match fetch(&conn, &query) {
        Ok(rows) => rows,
        Err(e) => {
            // The concatenated query failed to parse or run. That is an
            // outcome of the attacker input, not an operational failure.
            return Ok(ModuleOutcome::new(
                format!("query error: {}", e),
                Signal::RowSet(Vec::new()),
            ));
        }
    };

    let keys: Vec<String> = rows.iter().map(|(key, _)| key.clone()).collect();
    let raw_output = rows
        .iter()
        .map(|(key, rest)| {
            if rest.is_empty() {
                key.clone()
            } else {
                format!("{},{}", key, rest)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    Ok(ModuleOutcome::new(raw_output, Signal::RowSet(keys)))
}

fn fetch(conn: &Connection, query: &str) -> Result<Vec<(String, String)>, rusqlite::Error> {
    let mut stmt = conn.prepare(query)?;
    let column_count = stmt.column_count();
    let mut out = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let key: String = row.get::<_, rusqlite::types::Value>(0).map(render_value)?;
        let rest = (1..column_count)
            .map(|i| row.get::<_, rusqlite::types::Value>(i).map(render_value))
            .collect::<Result<Vec<_>, _>>()?
            .join(",");
        out.push((key, rest));
    }
    Ok(out)
}

fn render_value(value: rusqlite::types::Value) -> String {
    match value {
        rusqlite::types::Value::Null => "NULL".to_string(),
        rusqlite::types::Value::Integer(n) => n.to_string(),
        rusqlite::types::Value::Real(f) => f.to_string(),
        rusqlite::types::Value::Text(s) => s,
        rusqlite::types::Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::catalog::IsolationPolicy;

    const TEMPLATE: &str = "SELECT username, email FROM users WHERE username = '{input}'";

    fn context(input: &[u8]) -> RunContext {
        RunContext {
            run_id: 1,
            case_id: "query-user-lookup".into(),
            scratch: std::env::temp_dir(),
            started_at: Utc::now(),
            input: input.to_vec(),
            policy: IsolationPolicy::None,
        }
    }

    #[tokio::test]
    async fn test_well_formed_identifier_addresses_one_row() {
        let outcome = run(TEMPLATE, &context(b"alice")).await.unwrap();
        assert_eq!(outcome.signal, Signal::RowSet(vec!["alice".to_string()]));
        assert!(outcome.raw_output.contains("alice@example.com"));
    }

    #[tokio::test]
    async fn test_tautology_returns_all_sentinel_rows() {
        let outcome = run(TEMPLATE, &context(b"' OR '1'='1")).await.unwrap();
        let Signal::RowSet(keys) = &outcome.signal else {
            panic!("expected RowSet signal");
        };
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&"bob".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_identifier_returns_no_rows() {
        let outcome = run(TEMPLATE, &context(b"mallory")).await.unwrap();
        assert_eq!(outcome.signal, Signal::RowSet(Vec::new()));
    }

    #[tokio::test]
    async fn test_broken_syntax_is_a_query_error_outcome() {
        let outcome = run(TEMPLATE, &context(b"'")).await.unwrap();
        assert_eq!(outcome.signal, Signal::RowSet(Vec::new()));
        assert!(outcome.raw_output.starts_with("query error:"));
    }
}
