//! Bearer-token authentication extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::Utc;
use reelhub_core::error::CoreError;
use reelhub_core::principal::{BlockDecision, BlockState, Principal};
use reelhub_core::service::ServiceName;
use reelhub_core::types::DbId;
use reelhub_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The authenticated caller, re-read from the user store on every request.
///
/// ```ignore
/// async fn my_handler(AuthUser(user): AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let principal = resolve_principal(state, claims.sub).await?;
        Ok(AuthUser(principal))
    }
}

/// Optional authentication: `None` for anonymous callers and for tokens that
/// do not resolve to an active user.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<Principal>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key("authorization") {
            return Ok(MaybeAuthUser(None));
        }
        match AuthUser::from_request_parts(parts, state).await {
            Ok(AuthUser(user)) => Ok(MaybeAuthUser(Some(user))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable credentials");
                Ok(MaybeAuthUser(None))
            }
        }
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

fn bearer_token(parts: &Parts) -> AppResult<&str> {
    let auth_header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Unauthorized access!"))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

/// Load the live user record for `user_id` and apply its block state.
///
/// The user service reads its own store; every other service asks the user
/// service. A block whose end date has passed is lifted on the spot.
pub async fn resolve_principal(state: &AppState, user_id: DbId) -> AppResult<Principal> {
    let found = if state.service == ServiceName::User {
        UserRepo::find_by_id(state.db()?, user_id)
            .await?
            .map(|u| u.to_principal())
    } else {
        state
            .siblings
            .user
            .principal(user_id)
            .await
            .map_err(|e| e.upstream(ServiceName::User))?
    };
    let mut principal = found.ok_or_else(|| unauthorized("Unauthorized access!"))?;

    match principal.block.evaluate(Utc::now()) {
        BlockDecision::Active => {}
        BlockDecision::Expired => {
            lift_expired_block(state, user_id).await;
            principal.block = BlockState::cleared();
        }
        BlockDecision::Blocked(message) => {
            return Err(AppError::Core(CoreError::Unauthorized(message)));
        }
    }

    Ok(principal)
}

/// Clear a lapsed block. Failure only delays the write until the next request.
async fn lift_expired_block(state: &AppState, user_id: DbId) {
    let result = if state.service == ServiceName::User {
        match state.db() {
            Ok(pool) => UserRepo::unblock(pool, user_id)
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        }
    } else {
        state
            .siblings
            .user
            .unblock_auto(user_id)
            .await
            .map_err(|e| e.to_string())
    };

    match result {
        Ok(()) => tracing::info!(user_id, "Expired block lifted"),
        Err(e) => tracing::warn!(user_id, error = %e, "Failed to lift expired block"),
    }
}
