//! Client for the actor service's internal endpoints.

use async_trait::async_trait;
use reelhub_core::aggregation::BatchLookup;
use reelhub_core::contracts::{ActorProfiles, ActorSearchQuery, ActorSummary, BatchRequest};
use reelhub_core::error::CoreError;
use reelhub_core::types::DbId;

use crate::error::ClientError;
use crate::internal::InternalClient;

#[derive(Debug, Clone)]
pub struct ActorClient {
    inner: InternalClient,
}

impl ActorClient {
    pub fn new(inner: InternalClient) -> Self {
        Self { inner }
    }

    pub fn internal(&self) -> &InternalClient {
        &self.inner
    }

    /// Actors whose name matches `name`, at most `limit` of them.
    pub async fn search_profiles(
        &self,
        name: &str,
        limit: i64,
    ) -> Result<Vec<ActorSummary>, ClientError> {
        let query = ActorSearchQuery {
            name: Some(name.to_string()),
            limit: Some(limit),
        };
        let body: ActorProfiles = self
            .inner
            .get_with_query(self.inner.internal_url("/get-all"), &query)
            .await?;
        Ok(body.profiles)
    }
}

#[async_trait]
impl BatchLookup<ActorSummary> for ActorClient {
    async fn fetch_batch(&self, ids: &[DbId]) -> Result<Vec<ActorSummary>, CoreError> {
        let body = BatchRequest { ids: ids.to_vec() };
        self.inner
            .post(self.inner.internal_url("/batch"), &body)
            .await
            .map_err(|e| self.inner.upstream(e))
    }
}
