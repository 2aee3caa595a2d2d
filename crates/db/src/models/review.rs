//! Review and reply models.

use reelhub_core::aggregation::reviews::{ReplyRecord, ReviewThread};
use reelhub_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: DbId,
    pub owner: DbId,
    pub movie_id: DbId,
    pub content: String,
    pub rating: f64,
    pub is_spoiler: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReviewReply {
    pub id: DbId,
    pub review_id: DbId,
    pub owner: DbId,
    pub content: String,
    pub created_at: Timestamp,
}

impl Review {
    /// Attach the replies belonging to this review, in stored order.
    pub fn into_thread(self, replies: &[ReviewReply]) -> ReviewThread {
        ReviewThread {
            replies: replies
                .iter()
                .filter(|r| r.review_id == self.id)
                .map(|r| ReplyRecord {
                    id: r.id,
                    owner: r.owner,
                    content: r.content.clone(),
                    created_at: r.created_at,
                })
                .collect(),
            id: self.id,
            owner: self.owner,
            movie_id: self.movie_id,
            content: self.content,
            rating: self.rating,
            is_spoiler: self.is_spoiler,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateReview {
    pub owner: DbId,
    pub movie_id: DbId,
    pub content: String,
    pub rating: f64,
    pub is_spoiler: bool,
}

#[derive(Debug, Clone)]
pub struct UpdateReview {
    pub content: String,
    pub rating: f64,
    pub is_spoiler: bool,
}
