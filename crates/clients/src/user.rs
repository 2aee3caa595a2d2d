//! Client for the user service's internal endpoints.

use async_trait::async_trait;
use reelhub_core::aggregation::BatchLookup;
use reelhub_core::contracts::{BatchRequest, UserSummary};
use reelhub_core::error::CoreError;
use reelhub_core::principal::Principal;
use reelhub_core::types::DbId;

use crate::error::ClientError;
use crate::internal::InternalClient;

#[derive(Debug, Clone)]
pub struct UserClient {
    inner: InternalClient,
}

impl UserClient {
    pub fn new(inner: InternalClient) -> Self {
        Self { inner }
    }

    pub fn internal(&self) -> &InternalClient {
        &self.inner
    }

    /// Live principal record for `id`, or `None` if the user is gone.
    pub async fn principal(&self, id: DbId) -> Result<Option<Principal>, ClientError> {
        match self.inner.get(self.inner.internal_url(&format!("/{id}"))).await {
            Ok(principal) => Ok(Some(principal)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Lift an expired block on `id`.
    pub async fn unblock_auto(&self, id: DbId) -> Result<(), ClientError> {
        self.inner
            .patch(
                self.inner.internal_url(&format!("/{id}/unblock-auto")),
                &serde_json::json!({}),
            )
            .await
    }
}

#[async_trait]
impl BatchLookup<UserSummary> for UserClient {
    async fn fetch_batch(&self, ids: &[DbId]) -> Result<Vec<UserSummary>, CoreError> {
        let body = BatchRequest { ids: ids.to_vec() };
        self.inner
            .post(self.inner.internal_url("/batch"), &body)
            .await
            .map_err(|e| self.inner.upstream(e))
    }
}
