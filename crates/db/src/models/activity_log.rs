//! Activity log rows.

use reelhub_core::activity::{ActivityAction, ActivityLogEntry};
use reelhub_core::service::ServiceName;
use reelhub_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ActivityLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub action: String,
    pub details: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

impl ActivityLog {
    /// Tag the row with the service that stored it.
    ///
    /// Returns `None` for rows whose action tag is no longer recognised.
    pub fn into_entry(self, service: ServiceName) -> Option<ActivityLogEntry> {
        let action = self.action.parse::<ActivityAction>().ok()?;
        Some(ActivityLogEntry {
            id: self.id,
            service,
            user: self.user_id,
            action,
            details: self.details,
            ip: self.ip,
            user_agent: self.user_agent,
            created_at: self.created_at,
        })
    }
}

/// An entry waiting to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivityLog {
    pub user_id: Option<DbId>,
    pub action: ActivityAction,
    pub details: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}
