//! Repository for the `users` table.

use sqlx::PgPool;
use yamdb_core::roles::ROLE_ADMIN;
use yamdb_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, first_name, last_name, bio, role, is_superuser, \
                        confirmation_code_hash, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users
                (username, email, first_name, last_name, bio, role, is_superuser,
                 confirmation_code_hash)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .bind(&input.role)
            .bind(input.is_superuser)
            .bind(&input.confirmation_code_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users ordered by id, optionally filtered by a username substring.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE ($1::text IS NULL OR strpos(lower(username), lower($1)) > 0)
             ORDER BY id
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count users matching the same filter as [`UserRepo::list`].
    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM users
             WHERE ($1::text IS NULL OR strpos(lower(username), lower($1)) > 0)",
        )
        .bind(search)
        .fetch_one(pool)
        .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                bio = COALESCE($6, bio),
                role = COALESCE($7, role)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .bind(&input.role)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user and, by cascade, their reviews and comments.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store the hash of a freshly issued confirmation code.
    pub async fn set_confirmation_code_hash(
        pool: &PgPool,
        id: DbId,
        code_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET confirmation_code_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(code_hash)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Consume the pending confirmation code, but only if it still matches
    /// `code_hash`. Returns `false` when another request consumed it first.
    pub async fn consume_confirmation_code(
        pool: &PgPool,
        id: DbId,
        code_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET confirmation_code_hash = NULL
             WHERE id = $1 AND confirmation_code_hash = $2",
        )
        .bind(id)
        .bind(code_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Make sure a superuser with this username/email pair exists.
    ///
    /// An existing row with the same username is promoted to `admin` with the
    /// superuser flag and takes the given email; otherwise a new row is
    /// inserted. An email held by a different username fails on
    /// `uq_users_email`.
    pub async fn ensure_superuser(
        pool: &PgPool,
        username: &str,
        email: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, role, is_superuser)
             VALUES ($1, $2, $3, true)
             ON CONFLICT (username) DO UPDATE
                SET email = EXCLUDED.email, role = EXCLUDED.role, is_superuser = true
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(email)
            .bind(ROLE_ADMIN)
            .fetch_one(pool)
            .await
    }
}
