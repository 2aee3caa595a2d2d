//! Repository for the per-service `activity_logs` table.

use reelhub_core::activity::ActivityLogQuery;
use reelhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::activity_log::{ActivityLog, NewActivityLog};

const COLUMNS: &str = "id, user_id, action, details, ip, user_agent, created_at";

/// Append-only access to the activity log.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    pub async fn insert(pool: &PgPool, entry: &NewActivityLog) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO activity_logs (user_id, action, details, ip, user_agent)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(entry.user_id)
        .bind(entry.action.as_str())
        .bind(&entry.details)
        .bind(&entry.ip)
        .bind(&entry.user_agent)
        .fetch_one(pool)
        .await
    }

    /// Newest entries first, filtered by user and action.
    pub async fn query(
        pool: &PgPool,
        filter: &ActivityLogQuery,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs
             WHERE ($1::BIGINT IS NULL OR user_id = $1)
               AND ($2::TEXT IS NULL OR action = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(filter.user_id)
            .bind(filter.action.map(|a| a.as_str()))
            .bind(filter.effective_limit())
            .fetch_all(pool)
            .await
    }
}
