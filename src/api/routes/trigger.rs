use axum::{extract::State, Json};

use crate::api::models::{TriggerRequest, TriggerResponse};
use crate::api::AppState;
use crate::errors::SnareError;

pub async fn trigger_case(
    State(state): State<AppState>,
    Json(req): Json<TriggerRequest>,
) -> Result<Json<TriggerResponse>, SnareError> {
    let verdict = state
        .dispatcher
        .trigger(&req.case_id, req.input.as_bytes())
        .await?;

    Ok(Json(TriggerResponse {
        run_id: verdict.run_id,
        case_id: verdict.case_id,
        triggered: verdict.triggered,
        raw_output: verdict.raw_output,
        oracle_note: verdict.oracle_note,
    }))
}
