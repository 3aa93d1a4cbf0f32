pub mod errors;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::dispatch::Dispatcher;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", axum::routing::get(routes::health::health_check))
        .route("/api/trigger", axum::routing::post(routes::trigger::trigger_case))
        .route("/api/cases", axum::routing::get(routes::cases::list_cases))
        .route("/api/cases/:id", axum::routing::get(routes::cases::get_case))
        .route("/api/runs", axum::routing::get(routes::runs::list_runs))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
