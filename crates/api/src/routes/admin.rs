//! Route definitions for the admin service.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/api/admin`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /app-info          -> app_info
/// GET    /most-rated        -> most_rated
/// GET    /activity-logs     -> activity_logs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/app-info", get(admin::app_info))
        .route("/most-rated", get(admin::most_rated))
        .route("/activity-logs", get(admin::activity_logs))
}
