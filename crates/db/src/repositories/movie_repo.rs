//! Repository for the `movies` table.

use reelhub_core::media::MediaAsset;
use reelhub_core::movie::{MovieStatus, RAIL_LIMIT};
use reelhub_core::review_stats::{apply_review_ids, ReviewStatsPatch};
use reelhub_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::movie::{Movie, MovieFilter, MovieInput};

const COLUMNS: &str = "id, title, story_line, director, writers, producers, cast_members, \
                       release_date, status, movie_type, genres, tags, language, poster, \
                       trailer, rating_avg, review_count, review_ids, created_at, updated_at";

/// Filter shared by the catalogue listing and its count.
///
/// `$1` type, `$2` genre, `$3` actor id referenced in any credit.
const LIST_FILTER: &str = "($1::TEXT IS NULL OR movie_type = $1)
    AND ($2::TEXT IS NULL OR $2 = ANY(genres))
    AND ($3::BIGINT IS NULL
         OR director = $3
         OR $3 = ANY(writers)
         OR $3 = ANY(producers)
         OR cast_members @> jsonb_build_array(jsonb_build_object('actor', $3::BIGINT)))";

pub struct MovieRepo;

impl MovieRepo {
    pub async fn create(
        pool: &PgPool,
        input: &MovieInput,
        poster: Option<&MediaAsset>,
    ) -> Result<Movie, sqlx::Error> {
        let query = format!(
            "INSERT INTO movies (title, story_line, director, writers, producers, cast_members,
                                 release_date, status, movie_type, genres, tags, language,
                                 trailer, poster)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(&input.title)
            .bind(&input.story_line)
            .bind(input.credits.director)
            .bind(&input.credits.writers)
            .bind(&input.credits.producers)
            .bind(Json(&input.credits.cast))
            .bind(input.release_date)
            .bind(input.status.as_str())
            .bind(&input.movie_type)
            .bind(&input.genres)
            .bind(&input.tags)
            .bind(&input.language)
            .bind(Json(&input.trailer))
            .bind(poster.map(Json))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = ANY($1)");
        sqlx::query_as::<_, Movie>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Replace every editable field. The poster is only touched when
    /// `poster` is `Some`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &MovieInput,
        poster: Option<&MediaAsset>,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET
                title = $2,
                story_line = $3,
                director = $4,
                writers = $5,
                producers = $6,
                cast_members = $7,
                release_date = $8,
                status = $9,
                movie_type = $10,
                genres = $11,
                tags = $12,
                language = $13,
                trailer = $14,
                poster = COALESCE($15, poster),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.story_line)
            .bind(input.credits.director)
            .bind(&input.credits.writers)
            .bind(&input.credits.producers)
            .bind(Json(&input.credits.cast))
            .bind(input.release_date)
            .bind(input.status.as_str())
            .bind(&input.movie_type)
            .bind(&input.genres)
            .bind(&input.tags)
            .bind(&input.language)
            .bind(Json(&input.trailer))
            .bind(poster.map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of the catalogue, ordered by `filter.sort`.
    pub async fn list(
        pool: &PgPool,
        filter: &MovieFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE {LIST_FILTER}
             ORDER BY {}
             LIMIT $4 OFFSET $5",
            filter.sort.order_by()
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(filter.movie_type.as_deref())
            .bind(filter.genre.as_deref())
            .bind(filter.actor_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_filtered(pool: &PgPool, filter: &MovieFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM movies WHERE {LIST_FILTER}");
        sqlx::query_scalar(&query)
            .bind(filter.movie_type.as_deref())
            .bind(filter.genre.as_deref())
            .bind(filter.actor_id)
            .fetch_one(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(pool)
            .await
    }

    /// Case-insensitive title search across every status (staff use).
    pub async fn search_by_title(pool: &PgPool, title: &str) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE title ILIKE '%' || $1 || '%'
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(title)
            .fetch_all(pool)
            .await
    }

    pub async fn latest_public(pool: &PgPool, limit: i64) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE status = $1
             ORDER BY created_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(MovieStatus::Public.as_str())
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Public movies sharing at least one tag with `movie`.
    pub async fn related(pool: &PgPool, movie: &Movie) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE tags && $1 AND id <> $2 AND status = $3
             ORDER BY created_at DESC
             LIMIT $4"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(&movie.tags)
            .bind(movie.id)
            .bind(MovieStatus::Public.as_str())
            .bind(RAIL_LIMIT)
            .fetch_all(pool)
            .await
    }

    /// Best-rated public movies that have at least one review.
    pub async fn top_rated(
        pool: &PgPool,
        movie_type: Option<&str>,
    ) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE status = $1
               AND review_count > 0
               AND ($2::TEXT IS NULL OR movie_type = $2)
             ORDER BY rating_avg DESC, review_count DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(MovieStatus::Public.as_str())
            .bind(movie_type)
            .bind(RAIL_LIMIT)
            .fetch_all(pool)
            .await
    }

    /// Public movies matching `term` by title or genre, or crediting any of
    /// `actor_ids` as director, writer, or cast member.
    pub async fn search_public(
        pool: &PgPool,
        term: &str,
        actor_ids: &[DbId],
    ) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE status = $1
               AND (title ILIKE '%' || $2 || '%'
                    OR $2 = ANY(genres)
                    OR director = ANY($3)
                    OR writers && $3
                    OR EXISTS (
                        SELECT 1 FROM jsonb_array_elements(cast_members) AS c
                        WHERE (c ->> 'actor')::BIGINT = ANY($3)
                    ))
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(MovieStatus::Public.as_str())
            .bind(term)
            .bind(actor_ids)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the cached review statistics and apply the review-id
    /// bookkeeping carried by `patch`.
    ///
    /// Runs in a transaction holding the row lock, so concurrent patches
    /// serialise instead of losing id updates. Returns `false` if the movie
    /// does not exist.
    pub async fn apply_review_stats(
        pool: &PgPool,
        id: DbId,
        patch: &ReviewStatsPatch,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<Vec<DbId>> =
            sqlx::query_scalar("SELECT review_ids FROM movies WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(mut review_ids) = current else {
            return Ok(false);
        };
        apply_review_ids(&mut review_ids, patch);

        sqlx::query(
            "UPDATE movies SET rating_avg = $2, review_count = $3, review_ids = $4,
                              updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(patch.rating_avg)
        .bind(patch.review_count)
        .bind(&review_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
