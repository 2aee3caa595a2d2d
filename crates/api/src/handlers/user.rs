//! Handlers for the user service (`/api/user`).

use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use reelhub_core::activity::ActivityAction;
use reelhub_core::aggregation::catalog::{compose_movie_cards, MovieCard};
use reelhub_core::aggregation::BatchLookup;
use reelhub_core::contracts::{BatchRequest, UserSummary};
use reelhub_core::media::{release, MediaKind, UploadOptions};
use reelhub_core::movie::page_count;
use reelhub_core::principal::Principal;
use reelhub_core::roles::Role;
use reelhub_core::types::DbId;
use reelhub_db::models::user::{CreateUser, UserResponse};
use reelhub_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use super::record_activity;
use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{resolve_principal, AuthUser};
use crate::middleware::rbac::{RequireAdmin, RequireStaff};
use crate::middleware::request_meta::ClientMeta;
use crate::query::PageParams;
use crate::response::{MessageResponse, SuccessResponse};
use crate::state::AppState;
use crate::upload::read_form;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/user/create`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is missing!"))]
    pub name: String,
    #[validate(email(message = "Email is invalid!"))]
    pub email: String,
    #[validate(length(min = 8, max = 20, message = "Password must be 8 to 20 characters long!"))]
    pub password: String,
}

/// Request body for `POST /api/user/sign-in`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Email is invalid!"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is missing!"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name is missing!"))]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavoriteRequest {
    pub movie_id: DbId,
}

/// Request body for `PATCH /api/user/block/{id}`. No `days` blocks permanently.
#[derive(Debug, Default, Deserialize)]
pub struct BlockRequest {
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListParams {
    pub page_no: Option<i64>,
    pub limit: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedInUser {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
    pub avatar: Option<String>,
    pub is_verified: bool,
    pub favorites: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope<T> {
    pub user: T,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdated {
    pub user: UserResponse,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggled {
    pub message: &'static str,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize)]
pub struct FavoriteMovies {
    pub movies: Vec<MovieCard>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    pub users: Vec<UserResponse>,
    pub total_users: i64,
    pub page_count: i64,
}

#[derive(Debug, Serialize)]
pub struct UserUpdated {
    pub message: &'static str,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// POST /api/user/create
pub async fn create(
    State(state): State<AppState>,
    ClientMeta(meta): ClientMeta,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserEnvelope<CreatedUser>>)> {
    input.validate()?;
    let pool = state.db()?;
    let email = input.email.trim().to_lowercase();

    if UserRepo::find_by_email(pool, &email).await?.is_some() {
        return Err(AppError::validation("This email is already in use!"));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: input.name.trim().to_string(),
            email,
            password_hash,
            role: Role::User,
            is_verified: state.config.auto_verify_signups,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User registered");
    record_activity(
        &state,
        user.id,
        ActivityAction::Register,
        &json!({ "name": user.name, "email": user.email }),
        &meta,
    );

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            user: CreatedUser {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

/// POST /api/user/sign-in
///
/// Blocked accounts are refused here as well as on every authenticated
/// request.
pub async fn sign_in(
    State(state): State<AppState>,
    ClientMeta(meta): ClientMeta,
    Json(input): Json<SignInRequest>,
) -> AppResult<Json<UserEnvelope<SignedInUser>>> {
    input.validate()?;
    let mismatch = || AppError::validation("Email and password do not match!");

    let user = UserRepo::find_by_email(state.db()?, &input.email.trim().to_lowercase())
        .await?
        .ok_or_else(mismatch)?;

    let matched = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !matched {
        return Err(mismatch());
    }

    let principal = resolve_principal(&state, user.id).await?;
    let token = generate_token(principal.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    record_activity(
        &state,
        principal.id,
        ActivityAction::Login,
        &json!({ "email": principal.email }),
        &meta,
    );

    Ok(Json(UserEnvelope {
        user: SignedInUser {
            id: principal.id,
            name: principal.name,
            email: principal.email,
            role: principal.role,
            token,
            avatar: principal.avatar,
            is_verified: principal.is_verified,
            favorites: principal.favorites,
        },
    }))
}

/// GET /api/user/is-auth
pub async fn is_auth(AuthUser(user): AuthUser) -> Json<UserEnvelope<Principal>> {
    Json(UserEnvelope { user })
}

/// PATCH /api/user/update-profile
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ClientMeta(meta): ClientMeta,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<ProfileUpdated>> {
    input.validate()?;
    let name = input.name.trim();

    let updated = UserRepo::update_name(state.db()?, user.id, name)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.id))?;

    record_activity(
        &state,
        user.id,
        ActivityAction::UpdateProfile,
        &json!({ "name": name }),
        &meta,
    );

    Ok(Json(ProfileUpdated {
        user: UserResponse::from(&updated),
        message: "Profile updated successfully!",
    }))
}

/// POST /api/user/upload-avatar (multipart, file field `avatar`)
///
/// The previous avatar must be deleted from the media host before the new
/// one is stored.
pub async fn upload_avatar(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ClientMeta(meta): ClientMeta,
    multipart: Multipart,
) -> AppResult<Json<UserEnvelope<UserResponse>>> {
    let form = read_form(
        multipart,
        "avatar",
        MediaKind::Image,
        &state.config.upload_staging_dir,
    )
    .await?;
    let file = form
        .file
        .ok_or_else(|| AppError::validation("Avatar file is missing!"))?;

    let pool = state.db()?;
    let user = UserRepo::find_by_id(pool, principal.id)
        .await?
        .ok_or_else(|| AppError::not_found("User", principal.id))?;

    if let Some(old) = user.avatar.as_ref() {
        release(
            state.media.as_ref(),
            &old.0,
            MediaKind::Image,
            "Could not remove old avatar from cloud!",
        )
        .await?;
    }

    let avatar = state
        .media
        .upload(file.path(), &UploadOptions::avatar())
        .await?;
    let updated = UserRepo::set_avatar(pool, user.id, &avatar)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.id))?;

    record_activity(
        &state,
        user.id,
        ActivityAction::UploadAvatar,
        &json!({ "publicId": avatar.public_id }),
        &meta,
    );

    Ok(Json(UserEnvelope {
        user: UserResponse::from(&updated),
    }))
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

/// POST /api/user/toggle-favorite
///
/// Adding checks the movie exists through the movie service; removing does
/// not, so favorites of deleted movies can still be cleared.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<ToggleFavoriteRequest>,
) -> AppResult<Json<FavoriteToggled>> {
    if !user.has_favorite(input.movie_id) {
        let found = state.siblings.movie.fetch_batch(&[input.movie_id]).await?;
        if found.is_empty() {
            return Err(AppError::not_found("Movie", input.movie_id));
        }
    }

    let is_favorite = UserRepo::toggle_favorite(state.db()?, user.id, input.movie_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", user.id))?;

    Ok(Json(FavoriteToggled {
        message: if is_favorite {
            "Added to favorites!"
        } else {
            "Removed from favorites!"
        },
        is_favorite,
    }))
}

/// GET /api/user/favorites
pub async fn favorites(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<FavoriteMovies>> {
    let movies = compose_movie_cards(&user.favorites, &state.siblings.movie).await?;
    Ok(Json(FavoriteMovies { movies }))
}

// ---------------------------------------------------------------------------
// Moderation
// ---------------------------------------------------------------------------

/// GET /api/user/users?pageNo=&limit=&name=
pub async fn list_users(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<UserPage>> {
    let page = PageParams {
        page_no: params.page_no,
        limit: params.limit,
    };
    let name = params.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let pool = state.db()?;

    let (users, total_users) = tokio::try_join!(
        UserRepo::list(pool, name, page.limit(), page.offset()),
        UserRepo::count_filtered(pool, name),
    )?;

    Ok(Json(UserPage {
        users: users.iter().map(UserResponse::from).collect(),
        total_users,
        page_count: page_count(total_users, page.limit()),
    }))
}

/// PATCH /api/user/block/{id}
///
/// Staff may not block themselves, and only admins may block an admin.
pub async fn block_user(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<DbId>,
    body: Bytes,
) -> AppResult<Json<UserUpdated>> {
    let input: BlockRequest = if body.is_empty() {
        BlockRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?
    };
    if id == staff.id {
        return Err(AppError::validation("You cannot block yourself!"));
    }
    let until = match input.days {
        Some(days) if days <= 0 => {
            return Err(AppError::validation(
                "Block duration must be a positive number of days!",
            ))
        }
        Some(days) => Some(Utc::now() + Duration::days(days)),
        None => None,
    };

    let pool = state.db()?;
    let target = UserRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    if target.role() == Role::Admin && staff.role != Role::Admin {
        return Err(AppError::forbidden("Only admins can block an admin!"));
    }

    let blocked = UserRepo::block(pool, id, until)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    tracing::info!(user_id = id, blocked_by = staff.id, ?until, "User blocked");
    record_activity(
        &state,
        staff.id,
        ActivityAction::BlockUser,
        &json!({ "userId": id, "days": input.days }),
        &meta,
    );

    Ok(Json(UserUpdated {
        message: "User blocked successfully!",
        user: UserResponse::from(&blocked),
    }))
}

/// PATCH /api/user/unblock/{id}
pub async fn unblock_user(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !UserRepo::unblock(state.db()?, id).await? {
        return Err(AppError::not_found("User", id));
    }

    record_activity(
        &state,
        staff.id,
        ActivityAction::UnblockUser,
        &json!({ "userId": id }),
        &meta,
    );
    Ok(Json(MessageResponse::new("User unblocked successfully!")))
}

/// PATCH /api/user/role/{id}
pub async fn change_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ClientMeta(meta): ClientMeta,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeRoleRequest>,
) -> AppResult<Json<UserUpdated>> {
    if id == admin.id {
        return Err(AppError::validation("You cannot change your own role!"));
    }

    let updated = UserRepo::set_role(state.db()?, id, input.role)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    tracing::info!(user_id = id, role = %input.role, "User role changed");
    record_activity(
        &state,
        admin.id,
        ActivityAction::ChangeRole,
        &json!({ "userId": id, "role": input.role }),
        &meta,
    );

    Ok(Json(UserUpdated {
        message: "User role updated!",
        user: UserResponse::from(&updated),
    }))
}

// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

/// GET /api/user/internal/{id}
///
/// The live principal record sibling services authenticate against.
pub async fn internal_principal(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Principal>> {
    let user = UserRepo::find_by_id(state.db()?, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(Json(user.to_principal()))
}

/// PATCH /api/user/internal/{id}/unblock-auto
pub async fn internal_unblock_auto(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SuccessResponse>> {
    if !UserRepo::unblock(state.db()?, id).await? {
        return Err(AppError::not_found("User", id));
    }
    tracing::info!(user_id = id, "Expired block lifted on request");
    Ok(Json(SuccessResponse::OK))
}

/// POST /api/user/internal/batch
pub async fn internal_batch(
    State(state): State<AppState>,
    Json(input): Json<BatchRequest>,
) -> AppResult<Json<Vec<UserSummary>>> {
    let users = UserRepo::find_by_ids(state.db()?, &input.ids).await?;
    Ok(Json(users.iter().map(|u| u.to_summary()).collect()))
}
