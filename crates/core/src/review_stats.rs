//! Denormalized review statistics cached on each movie.
//!
//! The review service owns the ratings; the movie service only stores the
//! last pushed summary. Every push recomputes from the full live set, so a
//! missed push is repaired by the next successful one.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// `{ ratingAvg, reviewCount }` as cached on a movie.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub rating_avg: f64,
    pub review_count: i64,
}

impl ReviewStats {
    /// Stats for a movie with no reviews.
    pub const EMPTY: ReviewStats = ReviewStats {
        rating_avg: 0.0,
        review_count: 0,
    };

    /// Mean rating rounded to one decimal place, plus the review count.
    pub fn compute(ratings: &[f64]) -> Self {
        if ratings.is_empty() {
            return Self::EMPTY;
        }
        let total: f64 = ratings.iter().sum();
        let mean = total / ratings.len() as f64;
        Self {
            rating_avg: round_one_decimal(mean),
            review_count: ratings.len() as i64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.review_count == 0
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Body of `PATCH /api/movie/internal/{id}/review-stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStatsPatch {
    pub rating_avg: f64,
    pub review_count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_review_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_review_id: Option<DbId>,
}

impl ReviewStatsPatch {
    pub fn recount(stats: ReviewStats) -> Self {
        Self {
            rating_avg: stats.rating_avg,
            review_count: stats.review_count,
            add_review_id: None,
            remove_review_id: None,
        }
    }

    pub fn added(stats: ReviewStats, review_id: DbId) -> Self {
        Self {
            add_review_id: Some(review_id),
            ..Self::recount(stats)
        }
    }

    pub fn removed(stats: ReviewStats, review_id: DbId) -> Self {
        Self {
            remove_review_id: Some(review_id),
            ..Self::recount(stats)
        }
    }

    pub fn stats(&self) -> ReviewStats {
        ReviewStats {
            rating_avg: self.rating_avg,
            review_count: self.review_count,
        }
    }
}

/// Apply a patch's id bookkeeping to a movie's tracked review-id list.
///
/// Adding an id that is already tracked is a no-op, so a replayed patch
/// does not duplicate entries.
pub fn apply_review_ids(review_ids: &mut Vec<DbId>, patch: &ReviewStatsPatch) {
    if let Some(add) = patch.add_review_id {
        if !review_ids.contains(&add) {
            review_ids.push(add);
        }
    }
    if let Some(remove) = patch.remove_review_id {
        review_ids.retain(|id| *id != remove);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_ratings_gives_empty_sentinel() {
        assert_eq!(ReviewStats::compute(&[]), ReviewStats::EMPTY);
        assert!(ReviewStats::compute(&[]).is_empty());
    }

    #[test]
    fn single_rating_is_its_own_average() {
        let stats = ReviewStats::compute(&[8.0]);
        assert_eq!(stats.rating_avg, 8.0);
        assert_eq!(stats.review_count, 1);
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        let stats = ReviewStats::compute(&[7.0, 8.0, 8.0]);
        assert_eq!(stats.rating_avg, 7.7);
        assert_eq!(stats.review_count, 3);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let ratings = [6.5, 9.0, 3.0, 10.0];
        assert_eq!(ReviewStats::compute(&ratings), ReviewStats::compute(&ratings));
    }

    #[test]
    fn removing_a_review_drops_count_by_one() {
        let before = ReviewStats::compute(&[4.0, 9.0]);
        let after = ReviewStats::compute(&[9.0]);
        assert_eq!(after.review_count, before.review_count - 1);
        assert_eq!(after.rating_avg, 9.0);
    }

    #[test]
    fn patch_serializes_camel_case_and_omits_absent_ids() {
        let patch = ReviewStatsPatch::recount(ReviewStats::compute(&[5.0]));
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["ratingAvg"], 5.0);
        assert_eq!(json["reviewCount"], 1);
        assert!(json.get("addReviewId").is_none());
    }

    #[test]
    fn review_ids_add_and_remove() {
        let mut ids = vec![1, 2];
        apply_review_ids(&mut ids, &ReviewStatsPatch::added(ReviewStats::EMPTY, 3));
        apply_review_ids(&mut ids, &ReviewStatsPatch::added(ReviewStats::EMPTY, 3));
        assert_eq!(ids, vec![1, 2, 3]);
        apply_review_ids(&mut ids, &ReviewStatsPatch::removed(ReviewStats::EMPTY, 1));
        assert_eq!(ids, vec![2, 3]);
    }
}
