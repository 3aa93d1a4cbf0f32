use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::api::AppState;
use crate::catalog::VulnerabilityCase;

/// Catalogue metadata only. Trigger internals and oracle details stay
/// private so callers cannot tailor inputs to defeat the judgment.
fn case_summary(case: &VulnerabilityCase) -> Value {
    json!({
        "id": case.id,
        "class": case.class.as_str(),
        "description": case.description.trim(),
        "isolation": case.isolation.as_str(),
    })
}

pub async fn list_cases(State(state): State<AppState>) -> Json<Value> {
    let cases: Vec<Value> = state
        .dispatcher
        .catalog()
        .all()
        .iter()
        .map(case_summary)
        .collect();
    Json(json!({ "cases": cases, "total": cases.len() }))
}

pub async fn get_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.dispatcher.catalog().lookup(&id) {
        Some(case) => Ok(Json(case_summary(case))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "Case not found"})),
        )),
    }
}
