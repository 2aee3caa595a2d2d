//! User entity model and DTOs.

use reelhub_core::contracts::UserSummary;
use reelhub_core::media::MediaAsset;
use reelhub_core::principal::{BlockState, Principal};
use reelhub_core::roles::Role;
use reelhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// Full row from the `users` table.
///
/// Contains the password hash -- never serialize this directly. Use
/// [`UserResponse`], [`Principal`] or [`UserSummary`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_verified: bool,
    pub is_blocked: bool,
    pub blocked_until: Option<Timestamp>,
    pub avatar: Option<Json<MediaAsset>>,
    pub favorites: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The stored role. The column is constrained, so unknown values only
    /// appear after manual edits and fall back to the least privileged role.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_default()
    }

    pub fn block_state(&self) -> BlockState {
        BlockState {
            is_blocked: self.is_blocked,
            blocked_until: self.blocked_until,
        }
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.avatar.as_ref().map(|a| a.url.clone())
    }

    pub fn to_principal(&self) -> Principal {
        Principal {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role(),
            is_verified: self.is_verified,
            avatar: self.avatar_url(),
            favorites: self.favorites.clone(),
            block: self.block_state(),
        }
    }

    pub fn to_summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar_url(),
        }
    }
}

/// User as listed to staff.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub is_blocked: bool,
    pub blocked_until: Option<Timestamp>,
    pub avatar: Option<String>,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role(),
            is_verified: u.is_verified,
            is_blocked: u.is_blocked,
            blocked_until: u.blocked_until,
            avatar: u.avatar_url(),
            created_at: u.created_at,
        }
    }
}

/// DTO for inserting a new user. The password is already hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
}
