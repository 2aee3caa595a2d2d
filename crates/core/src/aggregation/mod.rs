//! Cross-service view composition.
//!
//! Aggregators never see another service's storage. They reach siblings only
//! through the lookup traits below, which the internal HTTP clients
//! implement and tests replace with in-memory fakes.
//!
//! Policies enforced here:
//! - referenced ids are deduplicated before any batch call;
//! - an empty id set never reaches the network;
//! - references the sibling could not resolve are omitted, not errors;
//! - independent fan-out branches run concurrently.

pub mod admin;
pub mod catalog;
pub mod credits;
pub mod reviews;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::activity::{ActivityLogEntry, ActivityLogQuery};
use crate::contracts::Identified;
use crate::error::CoreError;
use crate::fanout::{index_by_id, unique_ids};
use crate::service::ServiceName;
use crate::types::DbId;

/// A sibling's `POST .../internal/batch` endpoint.
#[async_trait]
pub trait BatchLookup<T>: Send + Sync {
    async fn fetch_batch(&self, ids: &[DbId]) -> Result<Vec<T>, CoreError>;
}

/// A sibling's `GET .../internal/count` endpoint.
#[async_trait]
pub trait CountSource: Send + Sync {
    fn service(&self) -> ServiceName;

    async fn count(&self) -> Result<i64, CoreError>;
}

/// A sibling's `GET .../internal/activity-logs` endpoint.
#[async_trait]
pub trait ActivityLogSource: Send + Sync {
    fn service(&self) -> ServiceName;

    async fn activity_logs(
        &self,
        query: &ActivityLogQuery,
    ) -> Result<Vec<ActivityLogEntry>, CoreError>;
}

/// Deduplicate `refs`, fetch them in one batch call, and index the result.
///
/// Returns an empty map without calling `source` when there is nothing to
/// resolve.
pub async fn fetch_referenced<T>(
    source: &dyn BatchLookup<T>,
    refs: impl IntoIterator<Item = DbId>,
) -> Result<HashMap<DbId, T>, CoreError>
where
    T: Identified + Send,
{
    let ids = unique_ids(refs);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let records = source.fetch_batch(&ids).await?;
    Ok(index_by_id(records))
}


#[cfg(test)]
mod tests {
    use super::fakes::RecordingLookup;
    use super::*;
    use crate::contracts::UserSummary;

    fn user(id: DbId) -> UserSummary {
        UserSummary {
            id,
            name: format!("user-{id}"),
            email: format!("u{id}@example.com"),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn empty_reference_set_makes_no_call() {
        let lookup = RecordingLookup::new(vec![user(1)]);
        let map = fetch_referenced(&lookup, Vec::new()).await.unwrap();
        assert!(map.is_empty());
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn repeated_references_are_fetched_once() {
        let lookup = RecordingLookup::new(vec![user(1), user(2)]);
        let map = fetch_referenced(&lookup, [1, 2, 1, 1]).await.unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(lookup.calls(), vec![vec![1, 2]]);
    }
}
