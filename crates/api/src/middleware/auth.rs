//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::Actor;
use yamdb_core::roles::Role;
use yamdb_core::types::DbId;
use yamdb_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// The token only identifies the user; role and superuser flag are loaded
/// from the database so changes made by an admin apply on the next request.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub username: String,
    pub role: Role,
    pub is_superuser: bool,
}

impl AuthUser {
    /// The caller as seen by the permission predicates.
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            role: self.role,
            is_superuser: self.is_superuser,
        }
    }
}

/// Pull the raw token out of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
            })?;

        let role: Role = user.role.parse().map_err(|_| {
            AppError::Core(CoreError::Internal(format!(
                "User {} has unknown role '{}'",
                user.id, user.role
            )))
        })?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
            role,
            is_superuser: user.is_superuser,
        })
    }
}
