//! Payloads exchanged on `.../internal/...` endpoints.
//!
//! Batch endpoints return projections, never full records, so owner-only
//! fields (password hashes, emails of actors, etc.) cannot leak between
//! services. Unknown ids are silently omitted from batch responses and the
//! response order is unspecified.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::media::MediaAsset;
use crate::movie::MovieStatus;
use crate::review_stats::ReviewStats;
use crate::types::DbId;

/// Body of every `POST .../internal/batch` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    pub ids: Vec<DbId>,
}

/// Body returned by every `GET .../internal/count` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

/// Anything returned from a batch endpoint can be re-indexed by id.
pub trait Identified {
    fn id(&self) -> DbId;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSummary {
    pub id: DbId,
    pub name: String,
    pub about: String,
    pub gender: String,
    pub avatar: Option<String>,
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub id: DbId,
    pub title: String,
    pub poster: Option<MediaAsset>,
    pub genres: Vec<String>,
    pub status: MovieStatus,
    pub review_stats: ReviewStats,
}

impl Identified for ActorSummary {
    fn id(&self) -> DbId {
        self.id
    }
}

impl Identified for UserSummary {
    fn id(&self) -> DbId {
        self.id
    }
}

impl Identified for MovieSummary {
    fn id(&self) -> DbId {
        self.id
    }
}

/// Query for the actor service's name search used by public movie search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorSearchQuery {
    pub name: Option<String>,
    pub limit: Option<i64>,
}

/// Wrapper returned by `GET /api/actor/internal/get-all`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorProfiles {
    pub profiles: Vec<ActorSummary>,
}

/// Compact movie card used by the related and top-rated rails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RailMovie {
    pub id: DbId,
    pub title: String,
    pub poster: Option<String>,
    #[serde(default)]
    pub responsive_posters: Vec<String>,
    pub reviews: ReviewStats,
}

/// Body of `GET /api/movie/top-rated` and `GET /api/movie/related/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RailMovies {
    pub movies: Vec<RailMovie>,
}
