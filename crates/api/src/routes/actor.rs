//! Route definitions for the actor service.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::actor;
use crate::state::AppState;

/// Routes mounted at `/api/actor`.
///
/// ```text
/// POST   /create                   -> create (staff, multipart)
/// POST   /update/{id}              -> update (staff, multipart)
/// DELETE /{id}                     -> delete (admin)
/// GET    /search?name=             -> search (staff)
/// GET    /latest-uploads           -> latest_uploads
/// GET    /actors                   -> list (staff)
/// GET    /single/{id}              -> single
///
/// POST   /internal/batch           -> internal_batch
/// GET    /internal/get-all         -> internal_get_all
/// GET    /internal/count           -> count
/// GET    /internal/activity-logs   -> activity_logs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(actor::create))
        .route("/update/{id}", post(actor::update))
        .route("/{id}", delete(actor::delete))
        .route("/search", get(actor::search))
        .route("/latest-uploads", get(actor::latest_uploads))
        .route("/actors", get(actor::list))
        .route("/single/{id}", get(actor::single))
        .route("/internal/batch", post(actor::internal_batch))
        .route("/internal/get-all", get(actor::internal_get_all))
        .merge(super::internal_common())
}
