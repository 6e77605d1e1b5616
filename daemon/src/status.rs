//! Optional status server: Prometheus metrics and a JSON snapshot.

use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, routing::get, Json, Router};
use horde_node::{TrackerHandle, TrackerMetrics};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("failed to bind status server on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("status server failed: {0}")]
    Serve(#[source] std::io::Error),
}

#[derive(Clone)]
pub struct StatusState {
    pub metrics: Arc<TrackerMetrics>,
    pub tracker: TrackerHandle,
}

pub fn router(state: StatusState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/status", get(status_handler))
        .with_state(state)
}

/// Serve on `addr` until shutdown is signalled.
pub async fn serve(
    addr: &str,
    state: StatusState,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), StatusError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StatusError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    tracing::info!(%addr, "status server listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
        .map_err(StatusError::Serve)
}

async fn metrics_handler(State(state): State<StatusState>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn status_handler(State(state): State<StatusState>) -> Response {
    match state.tracker.snapshot().await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
