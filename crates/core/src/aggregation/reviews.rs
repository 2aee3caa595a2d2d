//! Review threads joined with their authors and movies.

use serde::Serialize;

use super::{fetch_referenced, BatchLookup};
use crate::contracts::{MovieSummary, UserSummary};
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Title shown for reviews whose movie no longer resolves.
pub const UNKNOWN_MOVIE_TITLE: &str = "Unknown Movie";

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyRecord {
    pub id: DbId,
    pub owner: DbId,
    pub content: String,
    pub created_at: Timestamp,
}

/// A stored review with its replies, referencing users by id only.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewThread {
    pub id: DbId,
    pub owner: DbId,
    pub movie_id: DbId,
    pub content: String,
    pub rating: f64,
    pub is_spoiler: bool,
    pub created_at: Timestamp,
    pub replies: Vec<ReplyRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    pub id: DbId,
    pub name: String,
    pub avatar: Option<String>,
}

impl From<&UserSummary> for AuthorRef {
    fn from(u: &UserSummary) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            avatar: u.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyView {
    pub id: DbId,
    pub owner: Option<AuthorRef>,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub id: DbId,
    pub owner: Option<AuthorRef>,
    pub content: String,
    pub rating: f64,
    pub is_spoiler: bool,
    pub created_at: Timestamp,
    pub replies: Vec<ReplyView>,
}

/// Resolve review and reply authors with one user batch call.
///
/// Authors that no longer exist render as `null` so the review body stays
/// visible.
pub async fn compose_review_threads(
    threads: Vec<ReviewThread>,
    users: &dyn BatchLookup<UserSummary>,
) -> Result<Vec<ReviewView>, CoreError> {
    let refs = threads
        .iter()
        .flat_map(|t| std::iter::once(t.owner).chain(t.replies.iter().map(|r| r.owner)))
        .collect::<Vec<_>>();
    let found = fetch_referenced(users, refs).await?;
    let author = |id: DbId| found.get(&id).map(AuthorRef::from);

    Ok(threads
        .into_iter()
        .map(|t| ReviewView {
            id: t.id,
            owner: author(t.owner),
            content: t.content,
            rating: t.rating,
            is_spoiler: t.is_spoiler,
            created_at: t.created_at,
            replies: t
                .replies
                .into_iter()
                .map(|r| ReplyView {
                    id: r.id,
                    owner: author(r.owner),
                    content: r.content,
                    created_at: r.created_at,
                })
                .collect(),
        })
        .collect())
}

/// A user's own review as listed on their profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReviewView {
    pub id: DbId,
    pub movie_id: DbId,
    pub movie_title: String,
    pub content: String,
    pub rating: f64,
    pub created_at: Timestamp,
}

/// Attach movie titles to a user's reviews.
pub async fn compose_user_reviews(
    threads: Vec<ReviewThread>,
    movies: &dyn BatchLookup<MovieSummary>,
) -> Result<Vec<UserReviewView>, CoreError> {
    let found = fetch_referenced(movies, threads.iter().map(|t| t.movie_id)).await?;
    Ok(threads
        .into_iter()
        .map(|t| UserReviewView {
            id: t.id,
            movie_id: t.movie_id,
            movie_title: found
                .get(&t.movie_id)
                .map(|m| m.title.clone())
                .unwrap_or_else(|| UNKNOWN_MOVIE_TITLE.to_string()),
            content: t.content,
            rating: t.rating,
            created_at: t.created_at,
        })
        .collect())
}
