//! Repository for the `reviews` and `review_replies` tables.

use reelhub_core::aggregation::reviews::ReviewThread;
use reelhub_core::review_stats::ReviewStats;
use reelhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{CreateReview, Review, ReviewReply, UpdateReview};

const COLUMNS: &str =
    "id, owner, movie_id, content, rating, is_spoiler, created_at, updated_at";

const REPLY_COLUMNS: &str = "id, review_id, owner, content, created_at";

/// Name of the constraint enforcing one review per (owner, movie).
pub const UQ_REVIEWS_OWNER_MOVIE: &str = "uq_reviews_owner_movie";

pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review. A second review by the same owner for the same
    /// movie violates [`UQ_REVIEWS_OWNER_MOVIE`].
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (owner, movie_id, content, rating, is_spoiler)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.owner)
            .bind(input.movie_id)
            .bind(&input.content)
            .bind(input.rating)
            .bind(input.is_spoiler)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_owner_and_movie(
        pool: &PgPool,
        owner: DbId,
        movie_id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE owner = $1 AND movie_id = $2");
        sqlx::query_as::<_, Review>(&query)
            .bind(owner)
            .bind(movie_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE reviews SET content = $2, rating = $3, is_spoiler = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(&input.content)
            .bind(input.rating)
            .bind(input.is_spoiler)
            .fetch_optional(pool)
            .await
    }

    /// Delete a review and, by cascade, its replies.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Every live rating for `movie_id`, the input to the stats recompute.
    pub async fn ratings_for_movie(pool: &PgPool, movie_id: DbId) -> Result<Vec<f64>, sqlx::Error> {
        sqlx::query_scalar("SELECT rating FROM reviews WHERE movie_id = $1")
            .bind(movie_id)
            .fetch_all(pool)
            .await
    }

    /// Stats recomputed from every live review of `movie_id`.
    pub async fn stats_for_movie(pool: &PgPool, movie_id: DbId) -> Result<ReviewStats, sqlx::Error> {
        let ratings = Self::ratings_for_movie(pool, movie_id).await?;
        Ok(ReviewStats::compute(&ratings))
    }

    /// Reviews for a movie with their replies, newest review first.
    pub async fn threads_for_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<Vec<ReviewThread>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM reviews WHERE movie_id = $1 ORDER BY created_at DESC");
        let reviews = sqlx::query_as::<_, Review>(&query)
            .bind(movie_id)
            .fetch_all(pool)
            .await?;
        Self::attach_replies(pool, reviews).await
    }

    /// Reviews written by `owner`, newest first. Replies are not loaded.
    pub async fn list_by_owner(pool: &PgPool, owner: DbId) -> Result<Vec<ReviewThread>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM reviews WHERE owner = $1 ORDER BY created_at DESC");
        let reviews = sqlx::query_as::<_, Review>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await?;
        Ok(reviews.into_iter().map(|r| r.into_thread(&[])).collect())
    }

    async fn attach_replies(
        pool: &PgPool,
        reviews: Vec<Review>,
    ) -> Result<Vec<ReviewThread>, sqlx::Error> {
        if reviews.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<DbId> = reviews.iter().map(|r| r.id).collect();
        let query = format!(
            "SELECT {REPLY_COLUMNS} FROM review_replies
             WHERE review_id = ANY($1)
             ORDER BY created_at, id"
        );
        let replies = sqlx::query_as::<_, ReviewReply>(&query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;
        Ok(reviews.into_iter().map(|r| r.into_thread(&replies)).collect())
    }

    pub async fn add_reply(
        pool: &PgPool,
        review_id: DbId,
        owner: DbId,
        content: &str,
    ) -> Result<ReviewReply, sqlx::Error> {
        let query = format!(
            "INSERT INTO review_replies (review_id, owner, content)
             VALUES ($1, $2, $3)
             RETURNING {REPLY_COLUMNS}"
        );
        sqlx::query_as::<_, ReviewReply>(&query)
            .bind(review_id)
            .bind(owner)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    pub async fn find_reply(
        pool: &PgPool,
        review_id: DbId,
        reply_id: DbId,
    ) -> Result<Option<ReviewReply>, sqlx::Error> {
        let query =
            format!("SELECT {REPLY_COLUMNS} FROM review_replies WHERE id = $1 AND review_id = $2");
        sqlx::query_as::<_, ReviewReply>(&query)
            .bind(reply_id)
            .bind(review_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete_reply(pool: &PgPool, reply_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM review_replies WHERE id = $1")
            .bind(reply_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
            .fetch_one(pool)
            .await
    }
}
