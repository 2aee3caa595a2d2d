use axum::extract::State;
use axum::{routing::get, Json, Router};
use reelhub_core::service::ServiceName;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Which service answered.
    pub service: ServiceName,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable; absent for services without one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_healthy: Option<bool>,
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match &state.pool {
        Some(pool) => Some(reelhub_db::health_check(pool).await.is_ok()),
        None => None,
    };

    let status = if db_healthy == Some(false) {
        "degraded"
    } else {
        "ok"
    };

    Json(HealthResponse {
        status,
        service: state.service,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mount health check routes (root level, not under `/api/{service}`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
