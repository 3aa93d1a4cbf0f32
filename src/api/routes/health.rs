use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::api::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "snare",
        "cases": state.dispatcher.catalog().len(),
        "runs_in_flight": state.dispatcher.runs().in_flight(),
    }))
}
