//! Health check routes.

use axum::{Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};

use crate::api::server::AppState;

/// Create the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

/// Readiness check - has the token pool loaded at least once?
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.orchestrator.pool().is_ready() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}

/// Liveness check - is the process responding?
async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, "alive")
}
