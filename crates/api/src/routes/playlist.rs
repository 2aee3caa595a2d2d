//! Route definitions for the playlist service.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{internal, playlist};
use crate::state::AppState;

/// Routes mounted at `/api/playlist`. Every public route requires auth.
///
/// ```text
/// POST   /create            -> create
/// POST   /add-movie         -> add_movie
/// POST   /remove-movie      -> remove_movie
/// GET    /my-playlists      -> my_playlists
/// GET    /{id}              -> single
/// DELETE /{id}              -> delete
///
/// GET    /internal/count    -> count
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(playlist::create))
        .route("/add-movie", post(playlist::add_movie))
        .route("/remove-movie", post(playlist::remove_movie))
        .route("/my-playlists", get(playlist::my_playlists))
        .route("/{id}", get(playlist::single).delete(playlist::delete))
        .route("/internal/count", get(internal::count))
}
