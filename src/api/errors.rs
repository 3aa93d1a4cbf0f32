use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::errors::SnareError;

impl IntoResponse for SnareError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            SnareError::UnknownCase(_) => StatusCode::NOT_FOUND,
            SnareError::Overloaded(_) => StatusCode::SERVICE_UNAVAILABLE,
            SnareError::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = json!({
            "error": self.to_string(),
            "error_type": self.classify().error_type,
        });
        (status, Json(body)).into_response()
    }
}
