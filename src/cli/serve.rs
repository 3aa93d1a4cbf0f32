use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::commands::ServeArgs;
use crate::api::{build_router, AppState};
use crate::dispatch::Dispatcher;
use crate::errors::SnareError;

pub async fn handle_serve(args: ServeArgs) -> Result<(), SnareError> {
    let (config, registry) =
        super::load_harness(args.config.as_deref(), args.cases.as_deref()).await?;

    let addr = args.listen.unwrap_or_else(|| config.listen());
    let dispatcher = Arc::new(Dispatcher::from_config(&config, registry));

    let state = AppState {
        dispatcher: dispatcher.clone(),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, cases = dispatcher.catalog().len(), "Trigger surface listening");

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            signal_token.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| SnareError::Internal(format!("Server error: {}", e)))?;

    // Drain in-flight runs before exiting; each run is bounded by the
    // per-run timeout, so this terminates.
    while dispatcher.runs().in_flight() > 0 {
        info!(in_flight = dispatcher.runs().in_flight(), "Draining in-flight runs");
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    info!("Drained; shutting down");

    Ok(())
}
