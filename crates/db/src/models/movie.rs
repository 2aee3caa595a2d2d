//! Movie entity model and DTOs.

use chrono::NaiveDate;
use reelhub_core::contracts::MovieSummary;
use reelhub_core::media::MediaAsset;
use reelhub_core::movie::{CastMember, MovieCredits, MovieSort, MovieStatus};
use reelhub_core::review_stats::ReviewStats;
use reelhub_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub story_line: String,
    pub director: Option<DbId>,
    pub writers: Vec<DbId>,
    pub producers: Vec<DbId>,
    pub cast_members: Json<Vec<CastMember>>,
    pub release_date: Option<NaiveDate>,
    pub status: String,
    pub movie_type: String,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub language: String,
    pub poster: Option<Json<MediaAsset>>,
    pub trailer: Json<MediaAsset>,
    pub rating_avg: f64,
    pub review_count: i64,
    pub review_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Movie {
    pub fn status(&self) -> MovieStatus {
        self.status.parse().unwrap_or_default()
    }

    pub fn credits(&self) -> MovieCredits {
        MovieCredits {
            director: self.director,
            writers: self.writers.clone(),
            producers: self.producers.clone(),
            cast: self.cast_members.0.clone(),
        }
    }

    pub fn review_stats(&self) -> ReviewStats {
        ReviewStats {
            rating_avg: self.rating_avg,
            review_count: self.review_count,
        }
    }

    pub fn poster_asset(&self) -> Option<&MediaAsset> {
        self.poster.as_ref().map(|p| &p.0)
    }

    pub fn to_summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            poster: self.poster.as_ref().map(|p| p.0.clone()),
            genres: self.genres.clone(),
            status: self.status(),
            review_stats: self.review_stats(),
        }
    }
}

/// Every editable field. Create and update both write the full set.
#[derive(Debug, Clone)]
pub struct MovieInput {
    pub title: String,
    pub story_line: String,
    pub credits: MovieCredits,
    pub release_date: Option<NaiveDate>,
    pub status: MovieStatus,
    pub movie_type: String,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub language: String,
    pub trailer: MediaAsset,
}

/// Filters for the paginated catalogue listing.
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    pub movie_type: Option<String>,
    pub genre: Option<String>,
    pub actor_id: Option<DbId>,
    pub sort: MovieSort,
}
