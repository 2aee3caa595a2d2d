//! Route definitions for the review service.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

/// Routes mounted at `/api/review`.
///
/// ```text
/// POST   /add/{movieId}                        -> add (verified)
/// PATCH  /{reviewId}                           -> update (owner or staff)
/// DELETE /{reviewId}                           -> delete (owner or staff)
/// GET    /get-reviews-by-movie/{movieId}       -> by_movie
/// GET    /get-reviews-by-user                  -> by_user (auth)
/// POST   /add-reply/{reviewId}                 -> add_reply (verified)
/// DELETE /delete-reply/{reviewId}/{replyId}    -> delete_reply (owner or staff)
///
/// GET    /internal/count                       -> count
/// GET    /internal/activity-logs               -> activity_logs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add/{movie_id}", post(review::add))
        .route("/{review_id}", patch(review::update).delete(review::delete))
        .route("/get-reviews-by-movie/{movie_id}", get(review::by_movie))
        .route("/get-reviews-by-user", get(review::by_user))
        .route("/add-reply/{review_id}", post(review::add_reply))
        .route(
            "/delete-reply/{review_id}/{reply_id}",
            delete(review::delete_reply),
        )
        .merge(super::internal_common())
}
