//! Client for the movie service.

use async_trait::async_trait;
use reelhub_core::aggregation::BatchLookup;
use reelhub_core::contracts::{BatchRequest, MovieSummary, RailMovies};
use reelhub_core::error::CoreError;
use reelhub_core::review_stats::ReviewStatsPatch;
use reelhub_core::types::DbId;
use serde::Serialize;

use crate::error::ClientError;
use crate::internal::InternalClient;

#[derive(Debug, Clone)]
pub struct MovieClient {
    inner: InternalClient,
}

#[derive(Serialize)]
struct TopRatedQuery<'a> {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    movie_type: Option<&'a str>,
}

impl MovieClient {
    pub fn new(inner: InternalClient) -> Self {
        Self { inner }
    }

    pub fn internal(&self) -> &InternalClient {
        &self.inner
    }

    /// Push recomputed review statistics for `movie_id`.
    pub async fn patch_review_stats(
        &self,
        movie_id: DbId,
        patch: &ReviewStatsPatch,
    ) -> Result<(), ClientError> {
        self.inner
            .patch(
                self.inner.internal_url(&format!("/{movie_id}/review-stats")),
                patch,
            )
            .await
    }

    /// The public top-rated rail, optionally restricted to one type.
    pub async fn top_rated(&self, movie_type: Option<&str>) -> Result<RailMovies, ClientError> {
        self.inner
            .get_with_query(
                self.inner.public_url("/top-rated"),
                &TopRatedQuery { movie_type },
            )
            .await
    }
}

#[async_trait]
impl BatchLookup<MovieSummary> for MovieClient {
    async fn fetch_batch(&self, ids: &[DbId]) -> Result<Vec<MovieSummary>, CoreError> {
        let body = BatchRequest { ids: ids.to_vec() };
        self.inner
            .post(self.inner.internal_url("/batch"), &body)
            .await
            .map_err(|e| self.inner.upstream(e))
    }
}
