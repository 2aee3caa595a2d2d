//! Handlers for the review service (`/api/review`).
//!
//! Every mutation recomputes the movie's statistics from the live review
//! set and hands them to the background publisher. The response never waits
//! on the movie service.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use reelhub_core::activity::ActivityAction;
use reelhub_core::aggregation::reviews::{
    compose_review_threads, compose_user_reviews, AuthorRef, ReplyView, ReviewView,
    UserReviewView,
};
use reelhub_core::aggregation::BatchLookup;
use reelhub_core::error::CoreError;
use reelhub_core::movie::MovieStatus;
use reelhub_core::review_stats::{ReviewStats, ReviewStatsPatch};
use reelhub_core::types::DbId;
use reelhub_db::is_unique_violation;
use reelhub_db::models::review::{CreateReview, UpdateReview};
use reelhub_db::repositories::review_repo::UQ_REVIEWS_OWNER_MOVIE;
use reelhub_db::repositories::ReviewRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use super::record_activity;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireVerified;
use crate::middleware::request_meta::ClientMeta;
use crate::response::MessageResponse;
use crate::state::AppState;

const ALREADY_REVIEWED: &str = "Invalid request! Review already exists.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /add/{movieId}` and `PATCH /{reviewId}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[serde(default)]
    #[validate(length(max = 1000, message = "Content must be at most 1000 characters"))]
    pub content: String,
    #[validate(range(min = 0.0, max = 10.0, message = "Rating must be between 0 and 10!"))]
    pub rating: f64,
    #[serde(default)]
    pub is_spoiler: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReplyRequest {
    #[validate(length(min = 3, max = 1000, message = "Content must be between 3 and 1000 characters"))]
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub id: DbId,
    pub owner: AuthorRef,
    pub content: String,
    pub rating: f64,
    pub is_spoiler: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAdded {
    pub message: &'static str,
    pub reviews: ReviewStats,
    pub new_review: NewReview,
}

/// Acknowledgement for update and delete, echoing the recomputed stats.
#[derive(Debug, Serialize)]
pub struct ReviewChanged {
    pub message: &'static str,
    pub reviews: ReviewStats,
}

#[derive(Debug, Serialize)]
pub struct MovieReviews {
    pub title: Option<String>,
    pub reviews: Vec<ReviewView>,
}

#[derive(Debug, Serialize)]
pub struct MovieReviewsEnvelope {
    pub movie: MovieReviews,
}

#[derive(Debug, Serialize)]
pub struct UserReviews {
    pub reviews: Vec<UserReviewView>,
}

#[derive(Debug, Serialize)]
pub struct ReplyAdded {
    pub message: &'static str,
    pub reply: ReplyView,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Recompute the movie's stats from every review it currently has.
async fn current_stats(state: &AppState, movie_id: DbId) -> AppResult<ReviewStats> {
    Ok(ReviewRepo::stats_for_movie(state.db()?, movie_id).await?)
}

/// The movie must exist and be public to accept reviews.
async fn ensure_reviewable(state: &AppState, movie_id: DbId) -> AppResult<()> {
    let found = state.siblings.movie.fetch_batch(&[movie_id]).await?;
    match found.first() {
        Some(movie) if movie.status == MovieStatus::Public => Ok(()),
        _ => Err(AppError::not_found("Movie", movie_id)),
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// POST /api/review/add/{movieId}
///
/// One review per (owner, movie): checked up front, and enforced by
/// `uq_reviews_owner_movie` for concurrent submissions, which lose with 409.
pub async fn add(
    State(state): State<AppState>,
    RequireVerified(user): RequireVerified,
    ClientMeta(meta): ClientMeta,
    Path(movie_id): Path<DbId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<(StatusCode, Json<ReviewAdded>)> {
    input.validate()?;
    ensure_reviewable(&state, movie_id).await?;

    let pool = state.db()?;
    if ReviewRepo::find_by_owner_and_movie(pool, user.id, movie_id)
        .await?
        .is_some()
    {
        return Err(AppError::validation(ALREADY_REVIEWED));
    }

    let review = ReviewRepo::create(
        pool,
        &CreateReview {
            owner: user.id,
            movie_id,
            content: input.content.trim().to_string(),
            rating: input.rating,
            is_spoiler: input.is_spoiler,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e, UQ_REVIEWS_OWNER_MOVIE) {
            AppError::Core(CoreError::Conflict(ALREADY_REVIEWED.into()))
        } else {
            AppError::Database(e)
        }
    })?;

    let stats = current_stats(&state, movie_id).await?;
    state
        .review_stats
        .submit(movie_id, ReviewStatsPatch::added(stats, review.id));

    tracing::info!(review_id = review.id, movie_id, user_id = user.id, "Review added");
    record_activity(
        &state,
        user.id,
        ActivityAction::CreateReview,
        &json!({ "reviewId": review.id, "movieId": movie_id, "rating": review.rating }),
        &meta,
    );

    Ok((
        StatusCode::CREATED,
        Json(ReviewAdded {
            message: "Review added!",
            reviews: stats,
            new_review: NewReview {
                id: review.id,
                owner: AuthorRef {
                    id: user.id,
                    name: user.name,
                    avatar: user.avatar,
                },
                content: review.content,
                rating: review.rating,
                is_spoiler: review.is_spoiler,
            },
        }),
    ))
}

/// PATCH /api/review/{reviewId}
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ClientMeta(meta): ClientMeta,
    Path(review_id): Path<DbId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<Json<ReviewChanged>> {
    input.validate()?;
    let pool = state.db()?;

    let review = ReviewRepo::find_by_id(pool, review_id)
        .await?
        .ok_or_else(|| AppError::not_found("Review", review_id))?;
    if !user.can_manage(review.owner) {
        return Err(AppError::forbidden("You are not allowed to edit this review!"));
    }

    ReviewRepo::update(
        pool,
        review_id,
        &UpdateReview {
            content: input.content.trim().to_string(),
            rating: input.rating,
            is_spoiler: input.is_spoiler,
        },
    )
    .await?
    .ok_or_else(|| AppError::not_found("Review", review_id))?;

    let stats = current_stats(&state, review.movie_id).await?;
    state
        .review_stats
        .submit(review.movie_id, ReviewStatsPatch::recount(stats));

    record_activity(
        &state,
        user.id,
        ActivityAction::UpdateReview,
        &json!({ "reviewId": review_id, "movieId": review.movie_id, "rating": input.rating }),
        &meta,
    );

    Ok(Json(ReviewChanged {
        message: "Review updated!",
        reviews: stats,
    }))
}

/// DELETE /api/review/{reviewId}
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ClientMeta(meta): ClientMeta,
    Path(review_id): Path<DbId>,
) -> AppResult<Json<ReviewChanged>> {
    let pool = state.db()?;

    let review = ReviewRepo::find_by_id(pool, review_id)
        .await?
        .ok_or_else(|| AppError::not_found("Review", review_id))?;
    if !user.can_manage(review.owner) {
        return Err(AppError::forbidden("Not authorized to delete this review"));
    }

    if !ReviewRepo::delete(pool, review_id).await? {
        return Err(AppError::not_found("Review", review_id));
    }

    let stats = current_stats(&state, review.movie_id).await?;
    state
        .review_stats
        .submit(review.movie_id, ReviewStatsPatch::removed(stats, review_id));

    tracing::info!(review_id, movie_id = review.movie_id, "Review deleted");
    record_activity(
        &state,
        user.id,
        ActivityAction::DeleteReview,
        &json!({ "reviewId": review_id, "movieId": review.movie_id }),
        &meta,
    );

    Ok(Json(ReviewChanged {
        message: "Review deleted!",
        reviews: stats,
    }))
}

/// GET /api/review/get-reviews-by-movie/{movieId}
///
/// The movie title and the review authors are fetched concurrently. A
/// missing title does not hide the reviews.
pub async fn by_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
) -> AppResult<Json<MovieReviewsEnvelope>> {
    let threads = ReviewRepo::threads_for_movie(state.db()?, movie_id).await?;

    let ids = [movie_id];
    let (title, reviews) = tokio::join!(
        state.siblings.movie.fetch_batch(&ids),
        compose_review_threads(threads, &state.siblings.user),
    );
    let title = match title {
        Ok(movies) => movies.into_iter().next().map(|m| m.title),
        Err(e) => {
            tracing::warn!(movie_id, error = %e, "Movie title lookup failed");
            None
        }
    };

    Ok(Json(MovieReviewsEnvelope {
        movie: MovieReviews {
            title,
            reviews: reviews?,
        },
    }))
}

/// GET /api/review/get-reviews-by-user
///
/// Reviews of deleted movies are listed under a placeholder title.
pub async fn by_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<UserReviews>> {
    let threads = ReviewRepo::list_by_owner(state.db()?, user.id).await?;
    let reviews = compose_user_reviews(threads, &state.siblings.movie).await?;
    Ok(Json(UserReviews { reviews }))
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

/// POST /api/review/add-reply/{reviewId}
pub async fn add_reply(
    State(state): State<AppState>,
    RequireVerified(user): RequireVerified,
    Path(review_id): Path<DbId>,
    Json(input): Json<ReplyRequest>,
) -> AppResult<(StatusCode, Json<ReplyAdded>)> {
    input.validate()?;
    let pool = state.db()?;

    if ReviewRepo::find_by_id(pool, review_id).await?.is_none() {
        return Err(AppError::not_found("Review", review_id));
    }

    let reply = ReviewRepo::add_reply(pool, review_id, user.id, input.content.trim()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReplyAdded {
            message: "Reply added!",
            reply: ReplyView {
                id: reply.id,
                owner: Some(AuthorRef {
                    id: user.id,
                    name: user.name,
                    avatar: user.avatar,
                }),
                content: reply.content,
                created_at: reply.created_at,
            },
        }),
    ))
}

/// DELETE /api/review/delete-reply/{reviewId}/{replyId}
pub async fn delete_reply(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((review_id, reply_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MessageResponse>> {
    let pool = state.db()?;

    let reply = ReviewRepo::find_reply(pool, review_id, reply_id)
        .await?
        .ok_or_else(|| AppError::not_found("Reply", reply_id))?;
    if !user.can_manage(reply.owner) {
        return Err(AppError::forbidden("Not authorized to delete this reply"));
    }

    ReviewRepo::delete_reply(pool, reply_id).await?;
    Ok(Json(MessageResponse::new("Reply deleted!")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn review(rating: f64, content: &str) -> ReviewRequest {
        ReviewRequest {
            content: content.to_string(),
            rating,
            is_spoiler: false,
        }
    }

    #[test]
    fn ratings_outside_zero_to_ten_are_rejected() {
        assert!(review(0.0, "").validate().is_ok());
        assert!(review(10.0, "Great").validate().is_ok());
        assert!(review(10.5, "Great").validate().is_err());
        assert!(review(-1.0, "Great").validate().is_err());
    }

    #[test]
    fn reply_length_is_bounded() {
        let reply = |content: &str| ReplyRequest {
            content: content.to_string(),
        };
        assert_matches!(
            AppError::from(reply("ok").validate().unwrap_err()),
            AppError::Core(CoreError::Validation(_))
        );
        assert!(reply("fine").validate().is_ok());
        assert!(reply(&"x".repeat(1001)).validate().is_err());
    }

    #[test]
    fn rating_error_message_reaches_the_client() {
        let err = AppError::from(review(11.0, "").validate().unwrap_err());
        assert!(err.to_string().contains("Rating must be between 0 and 10!"));
    }
}
