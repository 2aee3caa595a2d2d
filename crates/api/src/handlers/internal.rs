//! Internal endpoints shared by every entity service.
//!
//! Reachable only service-to-service; the gateway refuses any path
//! containing `internal`, so these carry no auth checks.

use axum::extract::{Query, State};
use axum::Json;
use reelhub_core::activity::{ActivityLogEntry, ActivityLogQuery};
use reelhub_core::contracts::CountResponse;
use reelhub_core::service::ServiceName;
use reelhub_db::repositories::{
    ActivityLogRepo, ActorRepo, MovieRepo, PlaylistRepo, ReviewRepo, UserRepo,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/{service}/internal/count
pub async fn count(State(state): State<AppState>) -> AppResult<Json<CountResponse>> {
    let pool = state.db()?;
    let count = match state.service {
        ServiceName::User => UserRepo::count(pool).await?,
        ServiceName::Movie => MovieRepo::count(pool).await?,
        ServiceName::Actor => ActorRepo::count(pool).await?,
        ServiceName::Review => ReviewRepo::count(pool).await?,
        ServiceName::Playlist => PlaylistRepo::count(pool).await?,
        ServiceName::Admin => {
            return Err(AppError::InternalError(
                "The admin service keeps no counts".into(),
            ))
        }
    };
    Ok(Json(CountResponse { count }))
}

/// GET /api/{service}/internal/activity-logs?userId=&action=&limit=
///
/// Newest first. Rows whose action tag is no longer known are skipped.
pub async fn activity_logs(
    State(state): State<AppState>,
    Query(query): Query<ActivityLogQuery>,
) -> AppResult<Json<Vec<ActivityLogEntry>>> {
    let rows = ActivityLogRepo::query(state.db()?, &query).await?;
    let entries = rows
        .into_iter()
        .filter_map(|row| row.into_entry(state.service))
        .collect();
    Ok(Json(entries))
}
