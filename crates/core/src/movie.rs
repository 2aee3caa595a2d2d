//! Movie vocabulary and credit references.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum number of movies in the related and top-rated rails.
pub const RAIL_LIMIT: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MovieStatus {
    Public,
    #[default]
    Private,
}

impl MovieStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MovieStatus::Public => "public",
            MovieStatus::Private => "private",
        }
    }
}

impl fmt::Display for MovieStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovieStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(MovieStatus::Public),
            "private" => Ok(MovieStatus::Private),
            other => Err(CoreError::Validation(format!(
                "Invalid movie status '{other}'. Must be public or private"
            ))),
        }
    }
}

/// One cast entry: a reference into the actor service plus billing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub actor: DbId,
    pub role_as: String,
    #[serde(default)]
    pub lead_actor: bool,
}

/// Every actor reference a movie holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieCredits {
    pub director: Option<DbId>,
    pub writers: Vec<DbId>,
    pub producers: Vec<DbId>,
    pub cast: Vec<CastMember>,
}

impl MovieCredits {
    /// All referenced actor ids in reading order, duplicates included.
    pub fn referenced_ids(&self) -> impl Iterator<Item = DbId> + '_ {
        self.director
            .into_iter()
            .chain(self.writers.iter().copied())
            .chain(self.producers.iter().copied())
            .chain(self.cast.iter().map(|c| c.actor))
    }
}

/// Sort orders accepted by the public movie listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum MovieSort {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "releaseDate", alias = "releseDate")]
    ReleaseDate,
    #[serde(rename = "ratingAvg")]
    RatingAvg,
}

impl MovieSort {
    /// SQL `ORDER BY` clause for this sort. All orders are newest/highest first.
    pub fn order_by(self) -> &'static str {
        match self {
            MovieSort::CreatedAt => "created_at DESC",
            MovieSort::ReleaseDate => "release_date DESC NULLS LAST, created_at DESC",
            MovieSort::RatingAvg => "rating_avg DESC, review_count DESC, created_at DESC",
        }
    }
}

/// Number of pages needed to show `total` items at `limit` per page.
pub fn page_count(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referenced_ids_keep_reading_order_and_duplicates() {
        let credits = MovieCredits {
            director: Some(1),
            writers: vec![2, 1],
            producers: vec![3],
            cast: vec![CastMember {
                actor: 2,
                role_as: "Self".into(),
                lead_actor: true,
            }],
        };
        assert_eq!(credits.referenced_ids().collect::<Vec<_>>(), vec![1, 2, 1, 3, 2]);
    }

    #[test]
    fn status_parses_and_rejects() {
        assert_eq!("public".parse::<MovieStatus>().unwrap(), MovieStatus::Public);
        assert!("draft".parse::<MovieStatus>().is_err());
    }

    #[test]
    fn sort_accepts_legacy_spelling() {
        let sort: MovieSort = serde_json::from_str("\"releseDate\"").unwrap();
        assert_eq!(sort, MovieSort::ReleaseDate);
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 30), 0);
        assert_eq!(page_count(30, 30), 1);
        assert_eq!(page_count(31, 30), 2);
        assert_eq!(page_count(5, 0), 0);
    }
}
