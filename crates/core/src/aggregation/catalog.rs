//! Movie cards for playlists and favorites.

use serde::Serialize;

use super::{fetch_referenced, BatchLookup};
use crate::contracts::MovieSummary;
use crate::error::CoreError;
use crate::fanout::resolve_in_order;
use crate::review_stats::ReviewStats;
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieCard {
    pub id: DbId,
    pub title: String,
    pub poster: Option<String>,
    pub responsive_posters: Vec<String>,
    pub genres: Vec<String>,
    pub reviews: ReviewStats,
}

impl From<&MovieSummary> for MovieCard {
    fn from(m: &MovieSummary) -> Self {
        Self {
            id: m.id,
            title: m.title.clone(),
            poster: m.poster.as_ref().map(|p| p.url.clone()),
            responsive_posters: m
                .poster
                .as_ref()
                .map(|p| p.responsive.clone())
                .unwrap_or_default(),
            genres: m.genres.clone(),
            reviews: m.review_stats,
        }
    }
}

/// Render `movie_ids` as cards, in the given order, skipping deleted movies.
pub async fn compose_movie_cards(
    movie_ids: &[DbId],
    movies: &dyn BatchLookup<MovieSummary>,
) -> Result<Vec<MovieCard>, CoreError> {
    let found = fetch_referenced(movies, movie_ids.iter().copied()).await?;
    Ok(resolve_in_order(
        movie_ids.iter().copied(),
        &found,
        |id| *id,
        |_, m| MovieCard::from(m),
    ))
}
