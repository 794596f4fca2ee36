//! Handlers for the `/auth` resource (signup, token).
//!
//! There are no passwords: signup emails a one-time confirmation code and
//! `/auth/token` exchanges that code for a bearer token.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use yamdb_core::confirmation::{generate_code, hash_code, verify_code};
use yamdb_core::error::CoreError;
use yamdb_core::roles::ROLE_USER;
use yamdb_core::validation::{validate_email, validate_username};
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::UserRepo;
use yamdb_mail::confirmation_email;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
}

/// Echo of the registered pair.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub confirmation_code: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register a username/email pair and email a confirmation code. Repeating
/// the call with the same pair issues a new code; reusing either half with a
/// different partner is rejected.
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;

    let code = generate_code();
    let code_hash = hash_code(&code);

    let user = register_or_refresh(&state, &input, code_hash).await?;

    let email = confirmation_email(&state.config.mail_from, &user.email, &code);
    state.mailer.send(&email).await.map_err(|e| {
        AppError::InternalError(format!("Failed to send confirmation email: {e}"))
    })?;

    tracing::info!(user_id = user.id, "Confirmation code issued");

    Ok(Json(SignupResponse {
        username: user.username,
        email: user.email,
    }))
}

/// POST /api/v1/auth/token
///
/// Exchange a confirmation code for an access token. The code is consumed.
pub async fn token(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    if input.username.is_empty() || input.confirmation_code.is_empty() {
        return Err(CoreError::Validation(
            "username and confirmation_code are required".into(),
        )
        .into());
    }

    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| CoreError::not_found("User", &input.username))?;

    let invalid_code = || AppError::Core(CoreError::Validation("Invalid confirmation code".into()));

    if !verify_code(
        &input.confirmation_code,
        user.confirmation_code_hash.as_deref(),
    ) {
        tracing::info!(user_id = user.id, "Rejected confirmation code");
        return Err(invalid_code());
    }

    let code_hash = hash_code(&input.confirmation_code);
    if !UserRepo::consume_confirmation_code(&state.pool, user.id, &code_hash).await? {
        return Err(invalid_code());
    }

    let token = generate_access_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "Access token issued");

    Ok(Json(TokenResponse { token }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create the user, or store a fresh code for an existing identical pair.
async fn register_or_refresh(
    state: &AppState,
    input: &SignupRequest,
    code_hash: String,
) -> AppResult<User> {
    let by_username = UserRepo::find_by_username(&state.pool, &input.username).await?;
    let by_email = UserRepo::find_by_email(&state.pool, &input.email).await?;

    match (by_username, by_email) {
        (Some(user), Some(same)) if user.id == same.id => {
            UserRepo::set_confirmation_code_hash(&state.pool, user.id, &code_hash).await?;
            Ok(user)
        }
        (Some(_), _) => Err(CoreError::Validation(
            "A user with that username already exists".into(),
        )
        .into()),
        (None, Some(_)) => Err(CoreError::Validation(
            "A user with that email already exists".into(),
        )
        .into()),
        (None, None) => {
            let created = UserRepo::create(
                &state.pool,
                &CreateUser {
                    username: input.username.clone(),
                    email: input.email.clone(),
                    role: ROLE_USER.to_string(),
                    confirmation_code_hash: Some(code_hash),
                    ..CreateUser::default()
                },
            )
            .await?;
            tracing::info!(user_id = created.id, username = %created.username, "User registered");
            Ok(created)
        }
    }
}
