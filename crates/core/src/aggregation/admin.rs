//! Admin dashboard: platform counts and the merged activity feed.

use std::cmp::Reverse;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::{fetch_referenced, ActivityLogSource, BatchLookup, CountSource};
use crate::activity::{ActivityAction, ActivityLogEntry, ActivityLogQuery, MAX_LOG_QUERY_LIMIT};
use crate::contracts::UserSummary;
use crate::error::CoreError;
use crate::movie::page_count;
use crate::service::ServiceName;
use crate::types::{DbId, Timestamp};

pub const DEFAULT_FEED_LIMIT: i64 = 50;
pub const MAX_FEED_LIMIT: i64 = 200;

/// Entity totals across the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub movie_count: i64,
    pub review_count: i64,
    pub user_count: i64,
    pub actor_count: i64,
}

/// Query all four counters concurrently.
///
/// All-or-nothing: if any service fails the whole call fails, so the
/// dashboard never shows a mix of real and missing numbers.
pub async fn collect_counts(
    movies: &dyn CountSource,
    reviews: &dyn CountSource,
    users: &dyn CountSource,
    actors: &dyn CountSource,
) -> Result<AppInfo, CoreError> {
    let (movie_count, review_count, user_count, actor_count) =
        futures::try_join!(movies.count(), reviews.count(), users.count(), actors.count())?;
    Ok(AppInfo {
        movie_count,
        review_count,
        user_count,
        actor_count,
    })
}

/// Paging and filters for the merged feed. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    #[serde(default = "first_page")]
    pub page: i64,
    #[serde(default = "default_feed_limit")]
    pub limit: i64,
    pub user_id: Option<DbId>,
    pub action: Option<ActivityAction>,
}

fn first_page() -> i64 {
    1
}

fn default_feed_limit() -> i64 {
    DEFAULT_FEED_LIMIT
}

impl Default for FeedRequest {
    fn default() -> Self {
        Self {
            page: first_page(),
            limit: DEFAULT_FEED_LIMIT,
            user_id: None,
            action: None,
        }
    }
}

impl FeedRequest {
    fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_FEED_LIMIT),
            ..self
        }
    }

    /// Rows requested from each source.
    ///
    /// At least twice the page size, and never fewer than the rows needed to
    /// fill every page up to the requested one, so deeper pages see the same
    /// order as the first.
    fn per_source_limit(&self) -> i64 {
        (self.limit * 2)
            .max(self.page.saturating_mul(self.limit))
            .min(MAX_LOG_QUERY_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedUser {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: DbId,
    pub service: ServiceName,
    pub user: Option<FeedUser>,
    pub action: ActivityAction,
    pub details: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFeed {
    pub logs: Vec<FeedItem>,
    pub total_pages: i64,
    pub current_page: i64,
}

/// Merge every service's activity log into one page, newest first.
///
/// A source that fails contributes nothing and the feed is built from the
/// rest. Users are resolved only for the entries on the returned page; if
/// the user service is down those entries carry no user.
pub async fn merge_activity_feed(
    sources: &[&dyn ActivityLogSource],
    users: &dyn BatchLookup<UserSummary>,
    request: FeedRequest,
) -> ActivityFeed {
    let request = request.normalized();
    let query = &ActivityLogQuery {
        user_id: request.user_id,
        action: request.action,
        limit: Some(request.per_source_limit()),
    };

    let fetched = join_all(sources.iter().map(|source| async move {
        match source.activity_logs(query).await {
            Ok(logs) => logs,
            Err(e) => {
                tracing::warn!(
                    service = %source.service(),
                    error = %e,
                    "Activity log source failed, skipping",
                );
                Vec::new()
            }
        }
    }))
    .await;

    let mut merged: Vec<ActivityLogEntry> = fetched.into_iter().flatten().collect();
    merged.sort_by_key(|e| (Reverse(e.created_at), e.service.as_str(), Reverse(e.id)));

    let total_pages = page_count(merged.len() as i64, request.limit);
    let start = usize::try_from((request.page - 1).saturating_mul(request.limit))
        .unwrap_or(usize::MAX);
    let page: Vec<ActivityLogEntry> = merged
        .into_iter()
        .skip(start)
        .take(request.limit as usize)
        .collect();

    let found = match fetch_referenced(users, page.iter().filter_map(|e| e.user)).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(error = %e, "User lookup for activity feed failed");
            Default::default()
        }
    };

    let logs = page
        .into_iter()
        .map(|e| FeedItem {
            user: e.user.and_then(|id| found.get(&id)).map(|u| FeedUser {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
            }),
            id: e.id,
            service: e.service,
            action: e.action,
            details: e.details,
            ip: e.ip,
            user_agent: e.user_agent,
            created_at: e.created_at,
        })
        .collect();

    ActivityFeed {
        logs,
        total_pages,
        current_page: request.page,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::aggregation::fakes::RecordingLookup;

    struct FixedCount(ServiceName, Option<i64>);

    #[async_trait]
    impl CountSource for FixedCount {
        fn service(&self) -> ServiceName {
            self.0
        }

        async fn count(&self) -> Result<i64, CoreError> {
            self.1.ok_or(CoreError::Upstream {
                service: self.0.as_str(),
                message: "connection refused".into(),
            })
        }
    }

    struct FixedLog {
        service: ServiceName,
        entries: Option<Vec<ActivityLogEntry>>,
        seen_limits: Mutex<Vec<i64>>,
    }

    impl FixedLog {
        fn new(service: ServiceName, entries: Vec<ActivityLogEntry>) -> Self {
            Self {
                service,
                entries: Some(entries),
                seen_limits: Mutex::new(Vec::new()),
            }
        }

        fn down(service: ServiceName) -> Self {
            Self {
                service,
                entries: None,
                seen_limits: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ActivityLogSource for FixedLog {
        fn service(&self) -> ServiceName {
            self.service
        }

        async fn activity_logs(
            &self,
            query: &ActivityLogQuery,
        ) -> Result<Vec<ActivityLogEntry>, CoreError> {
            self.seen_limits.lock().unwrap().push(query.effective_limit());
            let entries = self.entries.clone().ok_or(CoreError::Upstream {
                service: self.service.as_str(),
                message: "timeout".into(),
            })?;
            let mut entries: Vec<_> = entries
                .into_iter()
                .filter(|e| query.user_id.map_or(true, |u| e.user == Some(u)))
                .collect();
            entries.sort_by_key(|e| Reverse(e.created_at));
            entries.truncate(query.effective_limit() as usize);
            Ok(entries)
        }
    }

    fn entry(service: ServiceName, id: DbId, minute: i64, user: Option<DbId>) -> ActivityLogEntry {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        ActivityLogEntry {
            id,
            service,
            user,
            action: ActivityAction::Login,
            details: None,
            ip: None,
            user_agent: None,
            created_at: base + Duration::minutes(minute),
        }
    }

    fn user(id: DbId) -> UserSummary {
        UserSummary {
            id,
            name: format!("user-{id}"),
            email: format!("u{id}@example.com"),
            avatar: None,
        }
    }

    // ---------------------------------------------------------------------------
    // Counts
    // ---------------------------------------------------------------------------

    #[tokio::test]
    async fn counts_are_collected_from_every_service() {
        let info = collect_counts(
            &FixedCount(ServiceName::Movie, Some(3)),
            &FixedCount(ServiceName::Review, Some(10)),
            &FixedCount(ServiceName::User, Some(7)),
            &FixedCount(ServiceName::Actor, Some(4)),
        )
        .await
        .unwrap();

        assert_eq!(
            info,
            AppInfo {
                movie_count: 3,
                review_count: 10,
                user_count: 7,
                actor_count: 4,
            }
        );
    }

    #[tokio::test]
    async fn one_dead_counter_fails_the_whole_call() {
        let result = collect_counts(
            &FixedCount(ServiceName::Movie, Some(3)),
            &FixedCount(ServiceName::Review, None),
            &FixedCount(ServiceName::User, Some(7)),
            &FixedCount(ServiceName::Actor, Some(4)),
        )
        .await;

        assert_matches!(result, Err(CoreError::Upstream { service: "review", .. }));
    }

    // ---------------------------------------------------------------------------
    // Activity feed
    // ---------------------------------------------------------------------------

    #[tokio::test]
    async fn feed_is_sorted_newest_first_across_services() {
        let users_log = FixedLog::new(
            ServiceName::User,
            vec![entry(ServiceName::User, 1, 1, Some(1)), entry(ServiceName::User, 2, 5, Some(1))],
        );
        let movie_log = FixedLog::new(ServiceName::Movie, vec![entry(ServiceName::Movie, 1, 3, Some(2))]);
        let lookup = RecordingLookup::new(vec![user(1), user(2)]);

        let feed = merge_activity_feed(&[&users_log, &movie_log], &lookup, FeedRequest::default()).await;

        let order: Vec<_> = feed.logs.iter().map(|l| (l.service, l.id)).collect();
        assert_eq!(
            order,
            vec![(ServiceName::User, 2), (ServiceName::Movie, 1), (ServiceName::User, 1)]
        );
        assert_eq!(feed.logs[1].user.as_ref().unwrap().name, "user-2");
        assert_eq!(lookup.calls(), vec![vec![1, 2]]);
    }

    #[tokio::test]
    async fn failed_source_contributes_nothing() {
        let users_log = FixedLog::new(ServiceName::User, vec![entry(ServiceName::User, 1, 1, None)]);
        let review_log = FixedLog::down(ServiceName::Review);
        let lookup = RecordingLookup::new(vec![]);

        let feed = merge_activity_feed(&[&users_log, &review_log], &lookup, FeedRequest::default()).await;

        assert_eq!(feed.logs.len(), 1);
        assert_eq!(feed.total_pages, 1);
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn pages_slice_the_full_merge() {
        let user_entries = (0..5).map(|i| entry(ServiceName::User, i, i * 2, None)).collect();
        let movie_entries = (0..5).map(|i| entry(ServiceName::Movie, i, i * 2 + 1, None)).collect();
        let users_log = FixedLog::new(ServiceName::User, user_entries);
        let movie_log = FixedLog::new(ServiceName::Movie, movie_entries);
        let lookup = RecordingLookup::new(vec![]);

        let request = FeedRequest {
            page: 3,
            limit: 3,
            ..Default::default()
        };
        let feed = merge_activity_feed(&[&users_log, &movie_log], &lookup, request).await;

        // minutes 9..0 newest first; page 3 holds minutes 3, 2, 1
        let minutes: Vec<_> = feed.logs.iter().map(|l| l.created_at.timestamp() / 60 % 60).collect();
        assert_eq!(minutes, vec![3, 2, 1]);
        assert_eq!(feed.total_pages, 4);
        assert_eq!(feed.current_page, 3);
        assert_eq!(users_log.seen_limits.lock().unwrap().as_slice(), &[9]);
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let users_log = FixedLog::new(ServiceName::User, vec![entry(ServiceName::User, 1, 1, Some(1))]);
        let lookup = RecordingLookup::new(vec![user(1)]);

        let request = FeedRequest {
            page: i64::MAX,
            limit: 50,
            ..Default::default()
        };
        let feed = merge_activity_feed(&[&users_log], &lookup, request).await;

        assert!(feed.logs.is_empty());
        assert_eq!(feed.total_pages, 1);
        assert_eq!(feed.current_page, i64::MAX);
        assert_eq!(users_log.seen_limits.lock().unwrap().as_slice(), &[MAX_LOG_QUERY_LIMIT]);
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn user_outage_keeps_entries_without_users() {
        let users_log = FixedLog::new(ServiceName::User, vec![entry(ServiceName::User, 1, 1, Some(8))]);
        let lookup = RecordingLookup::<UserSummary>::failing();

        let feed = merge_activity_feed(&[&users_log], &lookup, FeedRequest::default()).await;

        assert_eq!(feed.logs.len(), 1);
        assert!(feed.logs[0].user.is_none());
    }

    #[test]
    fn per_source_limit_covers_deep_pages() {
        let first = FeedRequest::default();
        assert_eq!(first.per_source_limit(), 100);
        let deep = FeedRequest {
            page: 10,
            limit: 50,
            ..Default::default()
        };
        assert_eq!(deep.per_source_limit(), 500);
    }
}
