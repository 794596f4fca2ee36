//! Handlers for the `/users` resource.
//!
//! `/users/me` is open to any authenticated user; everything else requires
//! [`RequireAdmin`]. Users are addressed by username.

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use yamdb_core::error::CoreError;
use yamdb_core::paging::PageRequest;
use yamdb_core::roles::Role;
use yamdb_core::validation::{validate_email, validate_person_name, validate_username};
use yamdb_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use yamdb_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    pub role: Option<Role>,
}

/// Request body for `PATCH /users/{username}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}

/// Request body for `PATCH /users/me`. Username, email and role are not
/// editable here and are ignored if sent.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

// ---------------------------------------------------------------------------
// Own profile
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
pub async fn get_me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserResponse>> {
    let user = find_by_id(&state, &auth).await?;
    Ok(Json(user.into()))
}

/// PATCH /api/v1/users/me
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<UpdateMeRequest>,
) -> AppResult<Json<UserResponse>> {
    validate_names(input.first_name.as_deref(), input.last_name.as_deref())?;

    let update = UpdateUser {
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
        ..UpdateUser::default()
    };
    let user = UserRepo::update(&state.pool, auth.user_id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &auth.username))?;

    tracing::info!(user_id = auth.user_id, "Profile updated");

    Ok(Json(user.into()))
}

// ---------------------------------------------------------------------------
// Admin user management
// ---------------------------------------------------------------------------

/// GET /api/v1/users
///
/// Paginated user list, `?search=` matches a username substring.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    QueryParams(params): QueryParams<SearchParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    let request = PageRequest::new(params.page, state.config.page_size)?;
    let search = params.term();

    let count = UserRepo::count(&state.pool, search).await?;
    request.ensure_in_range(count)?;
    let users = UserRepo::list(&state.pool, search, request.limit(), request.offset()).await?;

    let results = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(Page::new(&uri, &request, count, results)))
}

/// POST /api/v1/users
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;
    validate_names(Some(&input.first_name), Some(&input.last_name))?;

    let create = CreateUser {
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
        role: input.role.unwrap_or_default().as_str().to_string(),
        is_superuser: false,
        confirmation_code_hash: None,
    };
    let user = UserRepo::create(&state.pool, &create).await?;

    tracing::info!(user_id = user.id, created_by = admin.user_id, "User created by admin");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users/{username}
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    PathParam(username): PathParam<String>,
) -> AppResult<Json<UserResponse>> {
    let user = find_by_username(&state, &username).await?;
    Ok(Json(user.into()))
}

/// PATCH /api/v1/users/{username}
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    PathParam(username): PathParam<String>,
    JsonBody(input): JsonBody<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let existing = find_by_username(&state, &username).await?;

    if let Some(new_username) = &input.username {
        validate_username(new_username)?;
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    validate_names(input.first_name.as_deref(), input.last_name.as_deref())?;

    let update = UpdateUser {
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
        role: input.role.map(|r| r.as_str().to_string()),
    };
    let user = UserRepo::update(&state.pool, existing.id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &username))?;

    tracing::info!(user_id = user.id, updated_by = admin.user_id, "User updated by admin");

    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/{username}
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    PathParam(username): PathParam<String>,
) -> AppResult<StatusCode> {
    let user = find_by_username(&state, &username).await?;

    if !UserRepo::delete(&state.pool, user.id).await? {
        return Err(CoreError::not_found("User", &username).into());
    }

    tracing::info!(user_id = user.id, deleted_by = admin.user_id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_by_username(state: &AppState, username: &str) -> AppResult<User> {
    UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", username)))
}

async fn find_by_id(state: &AppState, auth: &AuthUser) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", &auth.username)))
}

fn validate_names(first_name: Option<&str>, last_name: Option<&str>) -> Result<(), CoreError> {
    if let Some(first_name) = first_name {
        validate_person_name("first_name", first_name)?;
    }
    if let Some(last_name) = last_name {
        validate_person_name("last_name", last_name)?;
    }
    Ok(())
}
