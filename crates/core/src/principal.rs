//! The authenticated caller, resolved fresh on every request.

use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::types::{DbId, Timestamp};

/// Block status stored on a user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockState {
    pub is_blocked: bool,
    pub blocked_until: Option<Timestamp>,
}

/// Outcome of checking a [`BlockState`] at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockDecision {
    /// Not blocked.
    Active,
    /// Was blocked until a time that has passed; the block must be lifted.
    Expired,
    /// Still blocked. Carries the message shown to the caller.
    Blocked(String),
}

impl BlockState {
    pub fn evaluate(&self, now: Timestamp) -> BlockDecision {
        if !self.is_blocked {
            return BlockDecision::Active;
        }
        match self.blocked_until {
            Some(until) if until < now => BlockDecision::Expired,
            Some(until) => BlockDecision::Blocked(format!(
                "Account blocked until {}",
                until.format("%Y-%m-%d")
            )),
            None => {
                BlockDecision::Blocked("Your account has been blocked permanently".to_string())
            }
        }
    }

    pub fn cleared() -> Self {
        Self::default()
    }
}

/// A live view of the calling user, threaded explicitly into handlers.
///
/// Served by `GET /api/user/internal/{id}` to sibling services; never
/// contains the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub avatar: Option<String>,
    #[serde(default)]
    pub favorites: Vec<DbId>,
    #[serde(flatten)]
    pub block: BlockState,
}

impl Principal {
    /// Owners may touch their own content; staff may touch anyone's.
    pub fn can_manage(&self, owner: DbId) -> bool {
        self.id == owner || self.role.is_staff()
    }

    pub fn has_favorite(&self, movie_id: DbId) -> bool {
        self.favorites.contains(&movie_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            id: 7,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role,
            is_verified: true,
            avatar: None,
            favorites: vec![3, 9],
            block: BlockState::default(),
        }
    }

    #[test]
    fn unblocked_user_is_active() {
        assert_eq!(BlockState::default().evaluate(Utc::now()), BlockDecision::Active);
    }

    #[test]
    fn lapsed_block_is_expired() {
        let now = Utc::now();
        let state = BlockState {
            is_blocked: true,
            blocked_until: Some(now - Duration::hours(1)),
        };
        assert_eq!(state.evaluate(now), BlockDecision::Expired);
    }

    #[test]
    fn timed_block_reports_date() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let state = BlockState {
            is_blocked: true,
            blocked_until: Some(Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()),
        };
        assert_eq!(
            state.evaluate(now),
            BlockDecision::Blocked("Account blocked until 2026-03-15".into())
        );
    }

    #[test]
    fn permanent_block_has_no_date() {
        let state = BlockState {
            is_blocked: true,
            blocked_until: None,
        };
        assert_eq!(
            state.evaluate(Utc::now()),
            BlockDecision::Blocked("Your account has been blocked permanently".into())
        );
    }

    #[test]
    fn owners_and_staff_can_manage() {
        assert!(principal(Role::User).can_manage(7));
        assert!(!principal(Role::User).can_manage(8));
        assert!(principal(Role::Moderator).can_manage(8));
    }

    #[test]
    fn block_state_is_flattened_on_the_wire() {
        let json = serde_json::to_value(principal(Role::Admin)).unwrap();
        assert_eq!(json["isBlocked"], false);
        assert_eq!(json["role"], "admin");
        assert!(json.get("block").is_none());
    }
}
