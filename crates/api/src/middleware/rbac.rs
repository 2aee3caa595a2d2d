//! Role and account-state extractors.
//!
//! Each wraps [`AuthUser`] and rejects callers that do not qualify.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use reelhub_core::principal::Principal;
use reelhub_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 otherwise.
pub struct RequireAdmin(pub Principal);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AppError::forbidden("Admin role required"));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `moderator` or `admin`. Rejects with 403 otherwise.
pub struct RequireStaff(pub Principal);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.role.is_staff() {
            return Err(AppError::forbidden("Moderator or Admin role required"));
        }
        Ok(RequireStaff(user))
    }
}

/// Requires a verified account, for posting reviews and replies.
pub struct RequireVerified(pub Principal);

impl FromRequestParts<AppState> for RequireVerified {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_verified {
            return Err(AppError::forbidden("Please verify your account first!"));
        }
        Ok(RequireVerified(user))
    }
}
