//! Route trees, one module per service.

pub mod actor;
pub mod admin;
pub mod health;
pub mod movie;
pub mod playlist;
pub mod review;
pub mod user;

use axum::routing::get;
use axum::Router;
use reelhub_core::service::ServiceName;

use crate::handlers::internal;
use crate::state::AppState;

/// Routes for `service`, mounted by the router under `/api/{service}`.
///
/// Each process serves exactly one service. The gateway maps
/// `/api/{service}/...` to that process unchanged.
pub fn service_routes(service: ServiceName) -> Router<AppState> {
    match service {
        ServiceName::User => user::router(),
        ServiceName::Movie => movie::router(),
        ServiceName::Actor => actor::router(),
        ServiceName::Review => review::router(),
        ServiceName::Playlist => playlist::router(),
        ServiceName::Admin => admin::router(),
    }
}

/// `GET /internal/count` and `GET /internal/activity-logs`, shared by every
/// entity service that records activity.
///
/// ```text
/// GET    /internal/count           -> count
/// GET    /internal/activity-logs   -> activity_logs
/// ```
fn internal_common() -> Router<AppState> {
    Router::new()
        .route("/internal/count", get(internal::count))
        .route("/internal/activity-logs", get(internal::activity_logs))
}
