//! Handlers for the movie service (`/api/movie`).

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use reelhub_core::activity::ActivityAction;
use reelhub_core::aggregation::credits::{
    compose_public_credits, resolve_credits, PersonRef, ResolvedCredits,
};
use reelhub_core::contracts::{ActorSummary, BatchRequest, MovieSummary, RailMovie, RailMovies};
use reelhub_core::media::{release, MediaAsset, MediaKind, UploadOptions};
use reelhub_core::movie::{page_count, CastMember, MovieCredits, MovieSort, MovieStatus};
use reelhub_core::review_stats::{ReviewStats, ReviewStatsPatch};
use reelhub_core::types::DbId;
use reelhub_db::models::movie::{Movie, MovieFilter, MovieInput};
use reelhub_db::repositories::MovieRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use super::record_activity;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::middleware::request_meta::ClientMeta;
use crate::query::{LimitParams, PageParams};
use crate::response::{MessageResponse, SuccessResponse};
use crate::state::AppState;
use crate::upload::{read_form, UploadForm};

/// Default size of the "latest uploads" rail.
const LATEST_LIMIT: i64 = 20;

/// Actors considered when public search matches credits by name.
const SEARCH_ACTOR_LIMIT: i64 = 100;

/// Multipart fields that carry JSON rather than plain text.
const JSON_FIELDS: &[&str] = &[
    "director",
    "writers",
    "producers",
    "cast",
    "genres",
    "tags",
    "trailer",
];

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Metadata fields of the create and update multipart forms.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct MovieForm {
    #[validate(length(min = 1, message = "Title is missing!"))]
    title: String,
    #[validate(length(min = 1, message = "Story line is important!"))]
    story_line: String,
    #[serde(default)]
    director: Option<DbId>,
    #[serde(default)]
    writers: Vec<DbId>,
    #[serde(default)]
    producers: Vec<DbId>,
    #[serde(default)]
    cast: Vec<CastMember>,
    #[serde(default, alias = "releseDate")]
    release_date: Option<NaiveDate>,
    #[serde(default)]
    status: MovieStatus,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Movie type is missing!"))]
    movie_type: String,
    #[validate(length(min = 1, message = "Genres must be an array of strings!"))]
    genres: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[validate(length(min = 1, message = "Language is missing!"))]
    language: String,
    trailer: Option<MediaAsset>,
}

impl MovieForm {
    fn parse(form: &UploadForm) -> AppResult<MovieInput> {
        let raw = form.to_json(JSON_FIELDS)?;
        let parsed: MovieForm =
            serde_json::from_value(raw).map_err(|e| AppError::BadRequest(e.to_string()))?;
        parsed.validate()?;

        if parsed.cast.iter().any(|c| c.role_as.trim().is_empty()) {
            return Err(AppError::validation("Role as is missing inside cast!"));
        }
        let trailer = parsed
            .trailer
            .filter(|t| !t.url.is_empty() && !t.public_id.is_empty())
            .ok_or_else(|| AppError::validation("Trailer info is missing!"))?;

        Ok(MovieInput {
            title: parsed.title.trim().to_string(),
            story_line: parsed.story_line,
            credits: MovieCredits {
                director: parsed.director,
                writers: parsed.writers,
                producers: parsed.producers,
                cast: parsed.cast,
            },
            release_date: parsed.release_date,
            status: parsed.status,
            movie_type: parsed.movie_type,
            genres: parsed.genres,
            tags: parsed.tags,
            language: parsed.language,
            trailer,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type")]
    pub movie_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieListParams {
    pub page_no: Option<i64>,
    pub limit: Option<i64>,
    #[serde(rename = "type")]
    pub movie_type: Option<String>,
    pub actor_id: Option<DbId>,
    pub genre: Option<String>,
    pub sort_by: Option<MovieSort>,
}

#[derive(Debug, Serialize)]
pub struct CreatedMovie {
    pub id: DbId,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct MovieEnvelope<T> {
    pub movie: T,
}

#[derive(Debug, Serialize)]
pub struct MovieUpdated {
    pub message: &'static str,
    pub movie: MovieSummary,
}

/// Catalogue row used by the listing and the staff search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieListItem {
    pub id: DbId,
    pub title: String,
    pub poster: Option<String>,
    pub responsive_posters: Vec<String>,
    pub genres: Vec<String>,
    pub status: MovieStatus,
    pub reviews: ReviewStats,
}

impl From<&Movie> for MovieListItem {
    fn from(m: &Movie) -> Self {
        Self {
            id: m.id,
            title: m.title.clone(),
            poster: m.poster_asset().map(|p| p.url.clone()),
            responsive_posters: m
                .poster_asset()
                .map(|p| p.responsive.clone())
                .unwrap_or_default(),
            genres: m.genres.clone(),
            status: m.status(),
            reviews: m.review_stats(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    pub movies: Vec<MovieListItem>,
    pub total_movies: i64,
    pub page_count: i64,
}

#[derive(Debug, Serialize)]
pub struct SearchResults<T> {
    pub results: Vec<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestMovie {
    pub id: DbId,
    pub title: String,
    pub story_line: String,
    pub poster: Option<String>,
    pub responsive_posters: Vec<String>,
    pub trailer: String,
}

#[derive(Debug, Serialize)]
pub struct LatestMovies {
    pub movies: Vec<LatestMovie>,
}

/// Everything the edit form needs, with credits resolved to full actors.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieForUpdate {
    pub id: DbId,
    pub title: String,
    pub story_line: String,
    pub poster: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub status: MovieStatus,
    #[serde(rename = "type")]
    pub movie_type: String,
    pub language: String,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub trailer: MediaAsset,
    #[serde(flatten)]
    pub credits: ResolvedCredits<ActorSummary>,
}

/// Public movie page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieView {
    pub id: DbId,
    pub title: String,
    pub story_line: String,
    pub release_date: Option<NaiveDate>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub language: String,
    #[serde(rename = "type")]
    pub movie_type: String,
    pub poster: Option<MediaAsset>,
    pub trailer: MediaAsset,
    #[serde(flatten)]
    pub credits: ResolvedCredits<PersonRef>,
    pub reviews: ReviewStats,
    pub is_favorite: bool,
}

fn rail_movie(m: &Movie) -> RailMovie {
    RailMovie {
        id: m.id,
        title: m.title.clone(),
        poster: m.poster_asset().map(|p| p.url.clone()),
        responsive_posters: m
            .poster_asset()
            .map(|p| p.responsive.clone())
            .unwrap_or_default(),
        reviews: m.review_stats(),
    }
}

fn rail(movies: &[Movie]) -> RailMovies {
    RailMovies {
        movies: movies.iter().map(rail_movie).collect(),
    }
}

fn search_term(query: &TitleQuery) -> AppResult<&str> {
    query
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("Invalid request!"))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/movie/upload-trailer (multipart, file field `video`)
pub async fn upload_trailer(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<MediaAsset>)> {
    let form = read_form(
        multipart,
        "video",
        MediaKind::Video,
        &state.config.upload_staging_dir,
    )
    .await?;
    let file = form
        .file
        .ok_or_else(|| AppError::validation("Video not found!"))?;

    let trailer = state
        .media
        .upload(file.path(), &UploadOptions::trailer())
        .await?;
    Ok((StatusCode::CREATED, Json(trailer)))
}

/// POST /api/movie/create (multipart, optional file field `poster`)
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ClientMeta(meta): ClientMeta,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<MovieEnvelope<CreatedMovie>>)> {
    let form = read_form(
        multipart,
        "poster",
        MediaKind::Image,
        &state.config.upload_staging_dir,
    )
    .await?;
    let input = MovieForm::parse(&form)?;

    let poster = match form.file.as_ref() {
        Some(file) => Some(
            state
                .media
                .upload(file.path(), &UploadOptions::poster())
                .await?,
        ),
        None => None,
    };

    let movie = MovieRepo::create(state.db()?, &input, poster.as_ref()).await?;

    tracing::info!(movie_id = movie.id, "Movie created");
    record_activity(
        &state,
        staff.id,
        ActivityAction::CreateMovie,
        &json!({ "movieId": movie.id, "title": movie.title }),
        &meta,
    );

    Ok((
        StatusCode::CREATED,
        Json(MovieEnvelope {
            movie: CreatedMovie {
                id: movie.id,
                title: movie.title,
            },
        }),
    ))
}

/// PATCH /api/movie/update/{id} (multipart, optional file field `poster`)
///
/// A new poster replaces the old one only after the old one is deleted from
/// the media host.
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<MovieUpdated>> {
    let form = read_form(
        multipart,
        "poster",
        MediaKind::Image,
        &state.config.upload_staging_dir,
    )
    .await?;
    let input = MovieForm::parse(&form)?;

    let pool = state.db()?;
    let existing = MovieRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Movie", id))?;

    let poster = match form.file.as_ref() {
        Some(file) => {
            if let Some(old) = existing.poster_asset() {
                release(
                    state.media.as_ref(),
                    old,
                    MediaKind::Image,
                    "Poster could not be updated!",
                )
                .await?;
            }
            Some(
                state
                    .media
                    .upload(file.path(), &UploadOptions::poster())
                    .await?,
            )
        }
        None => None,
    };

    let movie = MovieRepo::update(pool, id, &input, poster.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Movie", id))?;

    record_activity(
        &state,
        staff.id,
        ActivityAction::UpdateMovie,
        &json!({ "movieId": id, "title": movie.title }),
        &meta,
    );

    Ok(Json(MovieUpdated {
        message: "Movie updated!",
        movie: movie.to_summary(),
    }))
}

/// DELETE /api/movie/{id}
///
/// The poster (if any) and the trailer are released first; the row is kept
/// if the media host refuses either.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let pool = state.db()?;
    let movie = MovieRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Movie", id))?;

    if let Some(poster) = movie.poster_asset() {
        release(
            state.media.as_ref(),
            poster,
            MediaKind::Image,
            "Could not remove poster from cloud!",
        )
        .await?;
    }
    release(
        state.media.as_ref(),
        &movie.trailer.0,
        MediaKind::Video,
        "Could not remove trailer from cloud!",
    )
    .await?;

    if !MovieRepo::delete(pool, id).await? {
        return Err(AppError::not_found("Movie", id));
    }

    tracing::info!(movie_id = id, "Movie deleted");
    record_activity(
        &state,
        admin.id,
        ActivityAction::DeleteMovie,
        &json!({ "movieId": id, "title": movie.title }),
        &meta,
    );

    Ok(Json(MessageResponse::new("Movie deleted!")))
}

// ---------------------------------------------------------------------------
// Staff queries
// ---------------------------------------------------------------------------

/// GET /api/movie/for-update/{id}
///
/// Fails if the actor service is unreachable: the edit form must not drop
/// credits it could not load.
pub async fn for_update(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<DbId>,
) -> AppResult<Json<MovieEnvelope<MovieForUpdate>>> {
    let movie = MovieRepo::find_by_id(state.db()?, id)
        .await?
        .ok_or_else(|| AppError::not_found("Movie", id))?;

    let credits = resolve_credits(&movie.credits(), &state.siblings.actor).await?;

    Ok(Json(MovieEnvelope {
        movie: MovieForUpdate {
            id: movie.id,
            poster: movie.poster_asset().map(|p| p.url.clone()),
            status: movie.status(),
            title: movie.title,
            story_line: movie.story_line,
            release_date: movie.release_date,
            movie_type: movie.movie_type,
            language: movie.language,
            genres: movie.genres,
            tags: movie.tags,
            trailer: movie.trailer.0,
            credits,
        },
    }))
}

/// GET /api/movie/search?title=
pub async fn search(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<SearchResults<MovieListItem>>> {
    let title = search_term(&query)?;
    let movies = MovieRepo::search_by_title(state.db()?, title).await?;
    Ok(Json(SearchResults {
        results: movies.iter().map(MovieListItem::from).collect(),
    }))
}

// ---------------------------------------------------------------------------
// Public queries
// ---------------------------------------------------------------------------

/// GET /api/movie/movies?pageNo=&limit=&type=&actorId=&genre=&sortBy=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<MovieListParams>,
) -> AppResult<Json<MoviePage>> {
    let page = PageParams {
        page_no: params.page_no,
        limit: params.limit,
    };
    let filter = MovieFilter {
        movie_type: params.movie_type.filter(|t| !t.is_empty()),
        genre: params.genre.filter(|g| !g.is_empty()),
        actor_id: params.actor_id,
        sort: params.sort_by.unwrap_or_default(),
    };
    let pool = state.db()?;

    let (movies, total_movies) = tokio::try_join!(
        MovieRepo::list(pool, &filter, page.limit(), page.offset()),
        MovieRepo::count_filtered(pool, &filter),
    )?;

    Ok(Json(MoviePage {
        movies: movies.iter().map(MovieListItem::from).collect(),
        total_movies,
        page_count: page_count(total_movies, page.limit()),
    }))
}

/// GET /api/movie/latest-uploads?limit=
pub async fn latest_uploads(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<LatestMovies>> {
    let movies = MovieRepo::latest_public(state.db()?, params.limit_or(LATEST_LIMIT)).await?;
    Ok(Json(LatestMovies {
        movies: movies
            .iter()
            .map(|m| LatestMovie {
                id: m.id,
                title: m.title.clone(),
                story_line: m.story_line.clone(),
                poster: m.poster_asset().map(|p| p.url.clone()),
                responsive_posters: m
                    .poster_asset()
                    .map(|p| p.responsive.clone())
                    .unwrap_or_default(),
                trailer: m.trailer.url.clone(),
            })
            .collect(),
    }))
}

/// GET /api/movie/single/{id}
///
/// Private movies are only visible to staff. Credits degrade instead of
/// failing when actors are missing or the actor service is down.
pub async fn single(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MovieEnvelope<MovieView>>> {
    let movie = MovieRepo::find_by_id(state.db()?, id)
        .await?
        .ok_or_else(|| AppError::not_found("Movie", id))?;

    let is_staff = viewer.as_ref().is_some_and(|v| v.role.is_staff());
    if movie.status() != MovieStatus::Public && !is_staff {
        return Err(AppError::not_found("Movie", id));
    }

    let credits = compose_public_credits(&movie.credits(), &state.siblings.actor).await;
    let is_favorite = viewer.as_ref().is_some_and(|v| v.has_favorite(movie.id));

    Ok(Json(MovieEnvelope {
        movie: MovieView {
            id: movie.id,
            reviews: movie.review_stats(),
            poster: movie.poster.map(|p| p.0),
            title: movie.title,
            story_line: movie.story_line,
            release_date: movie.release_date,
            genres: movie.genres,
            tags: movie.tags,
            language: movie.language,
            movie_type: movie.movie_type,
            trailer: movie.trailer.0,
            credits,
            is_favorite,
        },
    }))
}

/// GET /api/movie/related/{id}
pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<RailMovies>> {
    let pool = state.db()?;
    let movie = MovieRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Movie", id))?;
    let movies = MovieRepo::related(pool, &movie).await?;
    Ok(Json(rail(&movies)))
}

/// GET /api/movie/top-rated?type=
pub async fn top_rated(
    State(state): State<AppState>,
    Query(query): Query<TypeQuery>,
) -> AppResult<Json<RailMovies>> {
    let movie_type = query.movie_type.as_deref().filter(|t| !t.is_empty());
    let movies = MovieRepo::top_rated(state.db()?, movie_type).await?;
    Ok(Json(rail(&movies)))
}

/// GET /api/movie/search-public?title=
///
/// Matches title and genre locally, and credits by actor name through the
/// actor service. If that lookup fails only the local matches are returned.
pub async fn search_public(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> AppResult<Json<SearchResults<RailMovie>>> {
    let term = search_term(&query)?;

    let actor_ids: Vec<DbId> = match state
        .siblings
        .actor
        .search_profiles(term, SEARCH_ACTOR_LIMIT)
        .await
    {
        Ok(actors) => actors.into_iter().map(|a| a.id).collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Actor search failed, matching titles and genres only");
            Vec::new()
        }
    };

    let movies = MovieRepo::search_public(state.db()?, term, &actor_ids).await?;
    Ok(Json(SearchResults {
        results: movies.iter().map(rail_movie).collect(),
    }))
}

// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

/// PATCH /api/movie/internal/{id}/review-stats
pub async fn internal_review_stats(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<ReviewStatsPatch>,
) -> AppResult<Json<SuccessResponse>> {
    if !MovieRepo::apply_review_stats(state.db()?, id, &patch).await? {
        return Err(AppError::not_found("Movie", id));
    }
    tracing::debug!(
        movie_id = id,
        rating_avg = patch.rating_avg,
        review_count = patch.review_count,
        "Review stats updated"
    );
    Ok(Json(SuccessResponse::OK))
}

/// POST /api/movie/internal/batch
pub async fn internal_batch(
    State(state): State<AppState>,
    Json(input): Json<BatchRequest>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let movies = MovieRepo::find_by_ids(state.db()?, &input.ids).await?;
    Ok(Json(movies.iter().map(|m| m.to_summary()).collect()))
}
