use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct TriggerRequest {
    pub case_id: String,
    /// Attacker-supplied payload, passed to the module as bytes.
    #[serde(default)]
    pub input: String,
}

#[derive(Serialize)]
pub struct TriggerResponse {
    pub run_id: u64,
    pub case_id: String,
    pub triggered: bool,
    pub raw_output: String,
    pub oracle_note: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
