//! Route definitions for the user service.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/api/user`.
///
/// ```text
/// POST   /create                        -> create
/// POST   /sign-in                       -> sign_in
/// GET    /is-auth                       -> is_auth (auth)
/// PATCH  /update-profile                -> update_profile (auth)
/// POST   /upload-avatar                 -> upload_avatar (auth, multipart)
/// POST   /toggle-favorite               -> toggle_favorite (auth)
/// GET    /favorites                     -> favorites (auth)
/// GET    /users                         -> list_users (staff)
/// PATCH  /block/{id}                    -> block_user (staff)
/// PATCH  /unblock/{id}                  -> unblock_user (staff)
/// PATCH  /role/{id}                     -> change_role (admin)
///
/// GET    /internal/{id}                 -> internal_principal
/// PATCH  /internal/{id}/unblock-auto    -> internal_unblock_auto
/// POST   /internal/batch                -> internal_batch
/// GET    /internal/count                -> count
/// GET    /internal/activity-logs        -> activity_logs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(user::create))
        .route("/sign-in", post(user::sign_in))
        .route("/is-auth", get(user::is_auth))
        .route("/update-profile", patch(user::update_profile))
        .route("/upload-avatar", post(user::upload_avatar))
        .route("/toggle-favorite", post(user::toggle_favorite))
        .route("/favorites", get(user::favorites))
        .route("/users", get(user::list_users))
        .route("/block/{id}", patch(user::block_user))
        .route("/unblock/{id}", patch(user::unblock_user))
        .route("/role/{id}", patch(user::change_role))
        .route("/internal/{id}", get(user::internal_principal))
        .route("/internal/{id}/unblock-auto", patch(user::internal_unblock_auto))
        .route("/internal/batch", post(user::internal_batch))
        .merge(super::internal_common())
}
