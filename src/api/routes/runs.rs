use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::api::AppState;

pub async fn list_runs(State(state): State<AppState>) -> Json<Value> {
    let runs: Vec<Value> = state
        .dispatcher
        .runs()
        .snapshot()
        .into_iter()
        .map(|run| {
            json!({
                "run_id": run.run_id,
                "case_id": run.case_id,
                "started_at": run.started_at.to_rfc3339(),
            })
        })
        .collect();

    let in_flight = runs.len();
    Json(json!({
        "runs": runs,
        "in_flight": in_flight,
        "ceiling": state.dispatcher.runs().ceiling(),
    }))
}
