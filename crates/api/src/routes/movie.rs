//! Route definitions for the movie service.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::movie;
use crate::state::AppState;

/// Routes mounted at `/api/movie`.
///
/// ```text
/// POST   /upload-trailer                -> upload_trailer (staff, multipart)
/// POST   /create                        -> create (staff, multipart)
/// PATCH  /update/{id}                   -> update (staff, multipart)
/// DELETE /{id}                          -> delete (admin)
/// GET    /for-update/{id}               -> for_update (staff)
/// GET    /search?title=                 -> search (staff)
/// GET    /movies                        -> list
/// GET    /latest-uploads                -> latest_uploads
/// GET    /single/{id}                   -> single (optional auth)
/// GET    /related/{id}                  -> related
/// GET    /top-rated?type=               -> top_rated
/// GET    /search-public?title=          -> search_public
///
/// PATCH  /internal/{id}/review-stats    -> internal_review_stats
/// POST   /internal/batch                -> internal_batch
/// GET    /internal/count                -> count
/// GET    /internal/activity-logs        -> activity_logs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload-trailer", post(movie::upload_trailer))
        .route("/create", post(movie::create))
        .route("/update/{id}", patch(movie::update))
        .route("/{id}", delete(movie::delete))
        .route("/for-update/{id}", get(movie::for_update))
        .route("/search", get(movie::search))
        .route("/movies", get(movie::list))
        .route("/latest-uploads", get(movie::latest_uploads))
        .route("/single/{id}", get(movie::single))
        .route("/related/{id}", get(movie::related))
        .route("/top-rated", get(movie::top_rated))
        .route("/search-public", get(movie::search_public))
        .route(
            "/internal/{id}/review-stats",
            patch(movie::internal_review_stats),
        )
        .route("/internal/batch", post(movie::internal_batch))
        .merge(super::internal_common())
}
