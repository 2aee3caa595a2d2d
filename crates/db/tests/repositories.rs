//! Repository tests against a real Postgres.
//!
//! These need `DATABASE_URL` pointing at a server where the test user may
//! create databases; run them with `cargo test -p reelhub-db -- --ignored`.

use reelhub_core::activity::{ActivityAction, ActivityLogQuery};
use reelhub_core::media::MediaAsset;
use reelhub_core::movie::{CastMember, MovieCredits, MovieStatus};
use reelhub_core::review_stats::{ReviewStats, ReviewStatsPatch};
use reelhub_core::roles::Role;
use reelhub_db::is_unique_violation;
use reelhub_db::models::activity_log::NewActivityLog;
use reelhub_db::models::movie::{MovieFilter, MovieInput};
use reelhub_db::models::review::CreateReview;
use reelhub_db::models::user::CreateUser;
use reelhub_db::repositories::review_repo::UQ_REVIEWS_OWNER_MOVIE;
use reelhub_db::repositories::{ActivityLogRepo, MovieRepo, ReviewRepo, UserRepo};
use sqlx::PgPool;

fn movie_input(title: &str, credits: MovieCredits) -> MovieInput {
    MovieInput {
        title: title.to_string(),
        story_line: "A story".to_string(),
        credits,
        release_date: None,
        status: MovieStatus::Public,
        movie_type: "Film".to_string(),
        genres: vec!["Drama".to_string()],
        tags: vec!["heist".to_string()],
        language: "English".to_string(),
        trailer: MediaAsset {
            url: "https://media.test/t.mp4".to_string(),
            public_id: "t".to_string(),
            responsive: vec![],
        },
    }
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "migrations/review")]
#[ignore = "requires DATABASE_URL"]
async fn second_review_by_same_owner_violates_constraint(pool: PgPool) {
    let input = CreateReview {
        owner: 1,
        movie_id: 10,
        content: "great".to_string(),
        rating: 8.0,
        is_spoiler: false,
    };
    ReviewRepo::create(&pool, &input).await.unwrap();

    let err = ReviewRepo::create(&pool, &input).await.unwrap_err();
    assert!(is_unique_violation(&err, UQ_REVIEWS_OWNER_MOVIE));
}

#[sqlx::test(migrations = "migrations/review")]
#[ignore = "requires DATABASE_URL"]
async fn replies_attach_to_their_review(pool: PgPool) {
    let review = ReviewRepo::create(
        &pool,
        &CreateReview {
            owner: 1,
            movie_id: 10,
            content: "great".to_string(),
            rating: 8.0,
            is_spoiler: false,
        },
    )
    .await
    .unwrap();
    ReviewRepo::add_reply(&pool, review.id, 2, "agreed").await.unwrap();

    let threads = ReviewRepo::threads_for_movie(&pool, 10).await.unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].replies.len(), 1);
    assert_eq!(threads[0].replies[0].owner, 2);

    let ratings = ReviewRepo::ratings_for_movie(&pool, 10).await.unwrap();
    assert_eq!(ReviewStats::compute(&ratings).rating_avg, 8.0);
}

#[sqlx::test(migrations = "migrations/review")]
#[ignore = "requires DATABASE_URL"]
async fn adding_then_deleting_a_review_recomputes_stats(pool: PgPool) {
    // Another movie's review must not leak into the recompute.
    ReviewRepo::create(
        &pool,
        &CreateReview {
            owner: 2,
            movie_id: 11,
            content: String::new(),
            rating: 3.0,
            is_spoiler: false,
        },
    )
    .await
    .unwrap();

    let review = ReviewRepo::create(
        &pool,
        &CreateReview {
            owner: 1,
            movie_id: 10,
            content: "great".to_string(),
            rating: 8.0,
            is_spoiler: false,
        },
    )
    .await
    .unwrap();

    let stats = ReviewRepo::stats_for_movie(&pool, 10).await.unwrap();
    assert_eq!(stats, ReviewStats { rating_avg: 8.0, review_count: 1 });
    let patch = ReviewStatsPatch::added(stats, review.id);
    assert_eq!(patch.add_review_id, Some(review.id));
    assert_eq!(patch.stats(), stats);

    assert!(ReviewRepo::delete(&pool, review.id).await.unwrap());

    let stats = ReviewRepo::stats_for_movie(&pool, 10).await.unwrap();
    assert_eq!(stats, ReviewStats::EMPTY);
    let patch = ReviewStatsPatch::removed(stats, review.id);
    assert_eq!(patch.remove_review_id, Some(review.id));
    assert_eq!((patch.rating_avg, patch.review_count), (0.0, 0));
}

// ---------------------------------------------------------------------------
// Movies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "migrations/movie")]
#[ignore = "requires DATABASE_URL"]
async fn review_stats_patch_is_idempotent(pool: PgPool) {
    let movie = MovieRepo::create(&pool, &movie_input("Heat", MovieCredits::default()), None)
        .await
        .unwrap();
    let patch = ReviewStatsPatch::added(ReviewStats::compute(&[8.0]), 77);

    assert!(MovieRepo::apply_review_stats(&pool, movie.id, &patch).await.unwrap());
    assert!(MovieRepo::apply_review_stats(&pool, movie.id, &patch).await.unwrap());

    let movie = MovieRepo::find_by_id(&pool, movie.id).await.unwrap().unwrap();
    assert_eq!(movie.review_ids, vec![77]);
    assert_eq!(movie.review_stats(), ReviewStats { rating_avg: 8.0, review_count: 1 });

    let patch = ReviewStatsPatch::removed(ReviewStats::EMPTY, 77);
    MovieRepo::apply_review_stats(&pool, movie.id, &patch).await.unwrap();
    let movie = MovieRepo::find_by_id(&pool, movie.id).await.unwrap().unwrap();
    assert!(movie.review_ids.is_empty());
    assert!(movie.review_stats().is_empty());
}

#[sqlx::test(migrations = "migrations/movie")]
#[ignore = "requires DATABASE_URL"]
async fn actor_filter_matches_any_credit(pool: PgPool) {
    let credits = MovieCredits {
        cast: vec![CastMember {
            actor: 5,
            role_as: "Lead".to_string(),
            lead_actor: true,
        }],
        ..Default::default()
    };
    MovieRepo::create(&pool, &movie_input("Cast", credits), None).await.unwrap();
    MovieRepo::create(&pool, &movie_input("Other", MovieCredits::default()), None)
        .await
        .unwrap();

    let filter = MovieFilter {
        actor_id: Some(5),
        ..Default::default()
    };
    let movies = MovieRepo::list(&pool, &filter, 30, 0).await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "Cast");
    assert_eq!(MovieRepo::count_filtered(&pool, &filter).await.unwrap(), 1);

    let found = MovieRepo::search_public(&pool, "nothing", &[5]).await.unwrap();
    assert_eq!(found.len(), 1);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "migrations/user")]
#[ignore = "requires DATABASE_URL"]
async fn favorites_toggle_on_and_off(pool: PgPool) {
    let user = UserRepo::create(
        &pool,
        &CreateUser {
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
            is_verified: true,
        },
    )
    .await
    .unwrap();

    assert_eq!(UserRepo::toggle_favorite(&pool, user.id, 3).await.unwrap(), Some(true));
    assert_eq!(UserRepo::toggle_favorite(&pool, user.id, 3).await.unwrap(), Some(false));
    assert_eq!(UserRepo::toggle_favorite(&pool, 999, 3).await.unwrap(), None);
}

#[sqlx::test(migrations = "migrations/user")]
#[ignore = "requires DATABASE_URL"]
async fn activity_log_query_filters_by_action(pool: PgPool) {
    for action in [ActivityAction::Login, ActivityAction::Register, ActivityAction::Login] {
        ActivityLogRepo::insert(
            &pool,
            &NewActivityLog {
                user_id: Some(1),
                action,
                details: None,
                ip: None,
                user_agent: None,
            },
        )
        .await
        .unwrap();
    }

    let query = ActivityLogQuery {
        action: Some(ActivityAction::Login),
        ..Default::default()
    };
    let rows = ActivityLogRepo::query(&pool, &query).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.action == "login"));
}
