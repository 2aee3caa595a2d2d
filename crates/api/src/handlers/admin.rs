//! Handlers for the admin service (`/api/admin`).
//!
//! The admin service owns no storage. Every view is assembled from the
//! entity services' internal endpoints.

use axum::extract::{Query, State};
use axum::Json;
use reelhub_core::aggregation::admin::{
    collect_counts, merge_activity_feed, ActivityFeed, AppInfo, FeedRequest,
};
use reelhub_core::aggregation::ActivityLogSource;
use reelhub_core::contracts::RailMovies;
use reelhub_core::service::ServiceName;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfoResponse {
    pub app_info: AppInfo,
}

/// GET /api/admin/app-info
///
/// Fails with 502 naming the first service that could not be counted.
pub async fn app_info(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<AppInfoResponse>> {
    let siblings = &state.siblings;
    let app_info = collect_counts(
        siblings.movie.internal(),
        &siblings.review,
        siblings.user.internal(),
        siblings.actor.internal(),
    )
    .await?;
    Ok(Json(AppInfoResponse { app_info }))
}

/// GET /api/admin/most-rated
pub async fn most_rated(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<RailMovies>> {
    let movies = state
        .siblings
        .movie
        .top_rated(None)
        .await
        .map_err(|e| e.upstream(ServiceName::Movie))?;
    Ok(Json(movies))
}

/// GET /api/admin/activity-logs?page=&limit=&userId=&action=
pub async fn activity_logs(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(request): Query<FeedRequest>,
) -> AppResult<Json<ActivityFeed>> {
    let siblings = &state.siblings;
    let sources: [&dyn ActivityLogSource; 4] = [
        siblings.user.internal(),
        siblings.movie.internal(),
        &siblings.review,
        siblings.actor.internal(),
    ];

    tracing::debug!(admin_id = admin.id, page = request.page, "Merging activity feed");
    let feed = merge_activity_feed(&sources, &siblings.user, request).await;
    Ok(Json(feed))
}
