//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the confirmation code hash -- NEVER serialize this to API
/// responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: String,
    pub is_superuser: bool,
    pub confirmation_code_hash: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Profile fields exposed by `/users` and `/users/me`.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
        }
    }
}

/// DTO for inserting a user.
#[derive(Debug, Clone, Default)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: String,
    pub is_superuser: bool,
    pub confirmation_code_hash: Option<String>,
}

/// DTO for updating a user. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<String>,
}
