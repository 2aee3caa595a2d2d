//! Activity log vocabulary.
//!
//! Each service keeps its own append-only log and may only record the
//! actions it owns. The admin service merges all of them into one feed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::service::ServiceName;
use crate::types::{DbId, Timestamp};

/// Default row cap for the internal activity-log query.
pub const DEFAULT_LOG_QUERY_LIMIT: i64 = 500;

/// Hard cap for the internal activity-log query.
pub const MAX_LOG_QUERY_LIMIT: i64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    // user service
    Login,
    Register,
    BlockUser,
    UnblockUser,
    ChangeRole,
    UploadAvatar,
    UpdateProfile,
    // movie service
    CreateMovie,
    UpdateMovie,
    DeleteMovie,
    // actor service
    CreateActor,
    UpdateActor,
    DeleteActor,
    // review service
    CreateReview,
    UpdateReview,
    DeleteReview,
}

impl ActivityAction {
    pub const ALL: [ActivityAction; 16] = [
        ActivityAction::Login,
        ActivityAction::Register,
        ActivityAction::BlockUser,
        ActivityAction::UnblockUser,
        ActivityAction::ChangeRole,
        ActivityAction::UploadAvatar,
        ActivityAction::UpdateProfile,
        ActivityAction::CreateMovie,
        ActivityAction::UpdateMovie,
        ActivityAction::DeleteMovie,
        ActivityAction::CreateActor,
        ActivityAction::UpdateActor,
        ActivityAction::DeleteActor,
        ActivityAction::CreateReview,
        ActivityAction::UpdateReview,
        ActivityAction::DeleteReview,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityAction::Login => "login",
            ActivityAction::Register => "register",
            ActivityAction::BlockUser => "block_user",
            ActivityAction::UnblockUser => "unblock_user",
            ActivityAction::ChangeRole => "change_role",
            ActivityAction::UploadAvatar => "upload_avatar",
            ActivityAction::UpdateProfile => "update_profile",
            ActivityAction::CreateMovie => "create_movie",
            ActivityAction::UpdateMovie => "update_movie",
            ActivityAction::DeleteMovie => "delete_movie",
            ActivityAction::CreateActor => "create_actor",
            ActivityAction::UpdateActor => "update_actor",
            ActivityAction::DeleteActor => "delete_actor",
            ActivityAction::CreateReview => "create_review",
            ActivityAction::UpdateReview => "update_review",
            ActivityAction::DeleteReview => "delete_review",
        }
    }

    /// The service whose log this action belongs to.
    pub fn owner(self) -> ServiceName {
        use ActivityAction::*;
        match self {
            Login | Register | BlockUser | UnblockUser | ChangeRole | UploadAvatar
            | UpdateProfile => ServiceName::User,
            CreateMovie | UpdateMovie | DeleteMovie => ServiceName::Movie,
            CreateActor | UpdateActor | DeleteActor => ServiceName::Actor,
            CreateReview | UpdateReview | DeleteReview => ServiceName::Review,
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivityAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown activity action '{s}'")))
    }
}

/// A persisted activity log row as returned by the internal query endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: DbId,
    pub service: ServiceName,
    pub user: Option<DbId>,
    pub action: ActivityAction,
    pub details: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

/// Filters accepted by every `GET .../internal/activity-logs` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogQuery {
    pub user_id: Option<DbId>,
    pub action: Option<ActivityAction>,
    pub limit: Option<i64>,
}

impl ActivityLogQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LOG_QUERY_LIMIT)
            .clamp(1, MAX_LOG_QUERY_LIMIT)
    }
}
