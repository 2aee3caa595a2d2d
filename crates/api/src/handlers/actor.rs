//! Handlers for the actor service (`/api/actor`).

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use reelhub_core::activity::ActivityAction;
use reelhub_core::contracts::{ActorProfiles, ActorSearchQuery, ActorSummary, BatchRequest};
use reelhub_core::media::{release, MediaKind, UploadOptions};
use reelhub_core::types::DbId;
use reelhub_db::models::actor::ActorInput;
use reelhub_db::repositories::ActorRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use super::record_activity;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::middleware::request_meta::ClientMeta;
use crate::query::{PageParams, DEFAULT_PAGE_LIMIT};
use crate::response::MessageResponse;
use crate::state::AppState;
use crate::upload::{read_form, UploadForm};

/// Rows returned by the staff name search.
const SEARCH_LIMIT: i64 = 20;

/// Actors shown on the "latest uploads" rail.
const LATEST_LIMIT: i64 = 12;

const AVATAR_DELETE_FAILED: &str = "Image could not be removed from cloud!";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Text fields of the create and update multipart forms.
#[derive(Debug, Validate)]
struct ActorForm {
    #[validate(length(min = 1, message = "Actor name is missing!"))]
    name: String,
    #[validate(length(min = 1, message = "About is a required field!"))]
    about: String,
    #[validate(length(min = 1, message = "Gender is a required field!"))]
    gender: String,
    birthday: Option<NaiveDate>,
}

impl ActorForm {
    fn parse(form: &UploadForm) -> AppResult<ActorInput> {
        let text = |name: &str| form.text(name).map(str::trim).unwrap_or_default().to_string();
        let birthday = match form.text("birthday").map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| AppError::validation("Birthday must be a YYYY-MM-DD date!"))?,
            ),
        };
        let parsed = ActorForm {
            name: text("name"),
            about: text("about"),
            gender: text("gender"),
            birthday,
        };
        parsed.validate()?;
        Ok(ActorInput {
            name: parsed.name,
            about: parsed.about,
            gender: parsed.gender,
            birthday: parsed.birthday,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorListParams {
    pub page_no: Option<i64>,
    pub limit: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActorEnvelope {
    pub actor: ActorSummary,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub results: Vec<ActorSummary>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/actor/create (multipart, optional file field `avatar`)
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ClientMeta(meta): ClientMeta,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ActorEnvelope>)> {
    let form = read_form(
        multipart,
        "avatar",
        MediaKind::Image,
        &state.config.upload_staging_dir,
    )
    .await?;
    let input = ActorForm::parse(&form)?;

    let avatar = match form.file.as_ref() {
        Some(file) => Some(
            state
                .media
                .upload(file.path(), &UploadOptions::avatar())
                .await?,
        ),
        None => None,
    };

    let actor = ActorRepo::create(state.db()?, &input, avatar.as_ref()).await?;

    tracing::info!(actor_id = actor.id, "Actor created");
    record_activity(
        &state,
        staff.id,
        ActivityAction::CreateActor,
        &json!({ "actorId": actor.id, "name": actor.name }),
        &meta,
    );

    Ok((
        StatusCode::CREATED,
        Json(ActorEnvelope {
            actor: actor.to_summary(),
        }),
    ))
}

/// POST /api/actor/update/{id} (multipart, optional file field `avatar`)
///
/// A replacement avatar is only uploaded once the old one is deleted.
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ActorEnvelope>)> {
    let form = read_form(
        multipart,
        "avatar",
        MediaKind::Image,
        &state.config.upload_staging_dir,
    )
    .await?;
    let input = ActorForm::parse(&form)?;

    let pool = state.db()?;
    let existing = ActorRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Actor", id))?;

    let avatar = match form.file.as_ref() {
        Some(file) => {
            if let Some(old) = existing.avatar_asset() {
                release(state.media.as_ref(), old, MediaKind::Image, AVATAR_DELETE_FAILED)
                    .await?;
            }
            Some(
                state
                    .media
                    .upload(file.path(), &UploadOptions::avatar())
                    .await?,
            )
        }
        None => None,
    };

    let actor = ActorRepo::update(pool, id, &input, avatar.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Actor", id))?;

    record_activity(
        &state,
        staff.id,
        ActivityAction::UpdateActor,
        &json!({ "actorId": id, "name": actor.name }),
        &meta,
    );

    Ok((
        StatusCode::CREATED,
        Json(ActorEnvelope {
            actor: actor.to_summary(),
        }),
    ))
}

/// DELETE /api/actor/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let pool = state.db()?;
    let actor = ActorRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Actor", id))?;

    if let Some(avatar) = actor.avatar_asset() {
        release(state.media.as_ref(), avatar, MediaKind::Image, AVATAR_DELETE_FAILED).await?;
    }

    if !ActorRepo::delete(pool, id).await? {
        return Err(AppError::not_found("Actor", id));
    }

    tracing::info!(actor_id = id, "Actor deleted");
    record_activity(
        &state,
        admin.id,
        ActivityAction::DeleteActor,
        &json!({ "actorId": id, "name": actor.name }),
        &meta,
    );

    Ok(Json(MessageResponse::new("Actor deleted!")))
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// GET /api/actor/search?name=
pub async fn search(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Query(query): Query<NameQuery>,
) -> AppResult<Json<SearchResults>> {
    let name =
        non_blank(query.name.as_deref()).ok_or_else(|| AppError::validation("Invalid request!"))?;
    let actors = ActorRepo::search_by_name(state.db()?, name, SEARCH_LIMIT).await?;
    Ok(Json(SearchResults {
        results: actors.iter().map(|a| a.to_summary()).collect(),
    }))
}

/// GET /api/actor/latest-uploads
pub async fn latest_uploads(State(state): State<AppState>) -> AppResult<Json<Vec<ActorSummary>>> {
    let actors = ActorRepo::latest(state.db()?, LATEST_LIMIT).await?;
    Ok(Json(actors.iter().map(|a| a.to_summary()).collect()))
}

/// GET /api/actor/actors?pageNo=&limit=&name=
pub async fn list(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Query(params): Query<ActorListParams>,
) -> AppResult<Json<ActorProfiles>> {
    let page = PageParams {
        page_no: params.page_no,
        limit: params.limit,
    };
    let actors = ActorRepo::list(
        state.db()?,
        non_blank(params.name.as_deref()),
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(Json(ActorProfiles {
        profiles: actors.iter().map(|a| a.to_summary()).collect(),
    }))
}

/// GET /api/actor/single/{id}
pub async fn single(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ActorEnvelope>> {
    let actor = ActorRepo::find_by_id(state.db()?, id)
        .await?
        .ok_or_else(|| AppError::not_found("Actor", id))?;
    Ok(Json(ActorEnvelope {
        actor: actor.to_summary(),
    }))
}

// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

/// POST /api/actor/internal/batch
pub async fn internal_batch(
    State(state): State<AppState>,
    Json(input): Json<BatchRequest>,
) -> AppResult<Json<Vec<ActorSummary>>> {
    let actors = ActorRepo::find_by_ids(state.db()?, &input.ids).await?;
    Ok(Json(actors.iter().map(|a| a.to_summary()).collect()))
}

/// GET /api/actor/internal/get-all?name=&limit=
///
/// Name search used by the movie service's public search.
pub async fn internal_get_all(
    State(state): State<AppState>,
    Query(query): Query<ActorSearchQuery>,
) -> AppResult<Json<ActorProfiles>> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT).max(1);
    let actors = ActorRepo::list(state.db()?, non_blank(query.name.as_deref()), limit, 0).await?;
    Ok(Json(ActorProfiles {
        profiles: actors.iter().map(|a| a.to_summary()).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)]) -> UploadForm {
        UploadForm {
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file: None,
        }
    }

    #[test]
    fn complete_form_parses() {
        let input = ActorForm::parse(&form(&[
            ("name", " Keanu Reeves "),
            ("about", "Actor"),
            ("gender", "male"),
            ("birthday", "1964-09-02"),
        ]))
        .unwrap();
        assert_eq!(input.name, "Keanu Reeves");
        assert_eq!(input.birthday, NaiveDate::from_ymd_opt(1964, 9, 2));
    }

    #[test]
    fn missing_name_is_a_validation_error() {
        let err = ActorForm::parse(&form(&[("about", "Actor"), ("gender", "male")])).unwrap_err();
        assert!(err.to_string().contains("Actor name is missing!"));
    }

    #[test]
    fn blank_birthday_is_ignored() {
        let input = ActorForm::parse(&form(&[
            ("name", "Ana"),
            ("about", "Actor"),
            ("gender", "female"),
            ("birthday", ""),
        ]))
        .unwrap();
        assert!(input.birthday.is_none());
    }
}
