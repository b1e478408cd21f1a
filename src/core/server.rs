//! Webhook HTTP surface.
//!
//! `POST /receive_request` validates the body, hands the job to the
//! [`Dispatcher`] and answers before any pipeline work happens.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::core::{validate_payload, Dispatcher};
use crate::error::JobError;

/// Shared state for the webhook handlers
#[derive(Clone)]
pub struct AppState {
    secret: Arc<str>,
    dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(secret: impl Into<Arc<str>>, dispatcher: Dispatcher) -> Self {
        Self {
            secret: secret.into(),
            dispatcher,
        }
    }
}

impl IntoResponse for JobError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            JobError::Malformed(_) => (StatusCode::BAD_REQUEST, "Invalid JSON"),
            JobError::Unauthorized => (StatusCode::FORBIDDEN, "Forbidden"),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/receive_request", post(receive_request))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /receive_request - accept a job and schedule its pipeline
async fn receive_request(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, JobError> {
    let job = validate_payload(&body, &state.secret).inspect_err(|e| match e {
        JobError::Malformed(reason) => warn!("Rejected job: {}", reason),
        JobError::Unauthorized => warn!("Rejected job: secret mismatch"),
    })?;

    let handle = state.dispatcher.dispatch(job);
    info!("Accepted job {}", handle.job_id);

    Ok(Json(json!({ "message": "Request accepted" })))
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(addr: &str, state: AppState) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| crate::SolveHookError::Bind {
            addr: addr.to_string(),
            source: e,
        })?;
    info!("Listening on {}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await
        .map_err(|e| crate::SolveHookError::Server(e.to_string()))
}

/// Resolve once `signal` fires. If the signal cannot be installed, never resolve.
async fn shutdown_on<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            error!("Cannot listen for Ctrl-C, graceful shutdown disabled: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
