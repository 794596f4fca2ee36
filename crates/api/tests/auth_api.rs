//! HTTP-level integration tests for signup, token issuance and `/users/me`.
//!
//! Each test gets a freshly migrated database from `#[sqlx::test]`, which
//! connects through `DATABASE_URL`.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get_auth, patch_json_auth, post_json};
use serde_json::json;
use sqlx::PgPool;
use yamdb_mail::MemoryMailer;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The code from the latest confirmation email sent to `email`.
fn code_sent_to(mailer: &MemoryMailer, email: &str) -> String {
    let message = mailer.last_to(email).expect("a confirmation email should be sent");
    message
        .body
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("Your confirmation code is: "))
        .expect("body should start with the code")
        .to_string()
}

async fn signup(pool: &PgPool, mailer: &Arc<MemoryMailer>, username: &str, email: &str) -> StatusCode {
    let app = common::build_test_app(pool.clone(), Arc::clone(mailer));
    let body = json!({ "username": username, "email": email });
    post_json(app, "/api/v1/auth/signup", body).await.status()
}

async fn request_token(
    pool: &PgPool,
    mailer: &Arc<MemoryMailer>,
    username: &str,
    code: &str,
) -> axum::http::Response<axum::body::Body> {
    let app = common::build_test_app(pool.clone(), Arc::clone(mailer));
    let body = json!({ "username": username, "confirmation_code": code });
    post_json(app, "/api/v1/auth/token", body).await
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

/// Signup echoes the pair and emails a 16-letter code.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_sends_code(pool: PgPool) {
    let mailer = Arc::new(MemoryMailer::new());
    let app = common::build_test_app(pool, Arc::clone(&mailer));

    let body = json!({ "username": "reader", "email": "reader@example.com" });
    let response = post_json(app, "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["username"], "reader");
    assert_eq!(json["email"], "reader@example.com");

    let code = code_sent_to(&mailer, "reader@example.com");
    assert_eq!(code.len(), 16);
    assert!(code.chars().all(|c| c.is_ascii_alphabetic()));
}

/// Repeating signup with the same pair succeeds and issues a new code.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_again_reissues_code(pool: PgPool) {
    let mailer = Arc::new(MemoryMailer::new());

    assert_eq!(signup(&pool, &mailer, "reader", "reader@example.com").await, StatusCode::OK);
    assert_eq!(signup(&pool, &mailer, "reader", "reader@example.com").await, StatusCode::OK);
    assert_eq!(mailer.sent().len(), 2);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

/// Either half of the pair taken by another account is a 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_rejects_taken_username_or_email(pool: PgPool) {
    let mailer = Arc::new(MemoryMailer::new());
    assert_eq!(signup(&pool, &mailer, "reader", "reader@example.com").await, StatusCode::OK);

    assert_eq!(
        signup(&pool, &mailer, "reader", "other@example.com").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        signup(&pool, &mailer, "other", "reader@example.com").await,
        StatusCode::BAD_REQUEST
    );
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// The emailed code yields a token that authenticates `/users/me`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_flow(pool: PgPool) {
    let mailer = Arc::new(MemoryMailer::new());
    signup(&pool, &mailer, "reader", "reader@example.com").await;
    let code = code_sent_to(&mailer, "reader@example.com");

    let response = request_token(&pool, &mailer, "reader", &code).await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["token"]
        .as_str()
        .expect("token should be a string")
        .to_string();

    let app = common::build_test_app(pool, mailer);
    let response = get_auth(app, "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["username"], "reader");
    assert_eq!(json["role"], "user");
}

/// A wrong code is rejected with 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_wrong_code(pool: PgPool) {
    let mailer = Arc::new(MemoryMailer::new());
    signup(&pool, &mailer, "reader", "reader@example.com").await;

    let response = request_token(&pool, &mailer, "reader", "AAAAAAAAAAAAAAAA").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A code works exactly once.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_code_is_single_use(pool: PgPool) {
    let mailer = Arc::new(MemoryMailer::new());
    signup(&pool, &mailer, "reader", "reader@example.com").await;
    let code = code_sent_to(&mailer, "reader@example.com");

    let first = request_token(&pool, &mailer, "reader", &code).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = request_token(&pool, &mailer, "reader", &code).await;
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
}

/// Re-signup invalidates the previous code.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resignup_replaces_code(pool: PgPool) {
    let mailer = Arc::new(MemoryMailer::new());
    signup(&pool, &mailer, "reader", "reader@example.com").await;
    let old_code = code_sent_to(&mailer, "reader@example.com");
    signup(&pool, &mailer, "reader", "reader@example.com").await;
    let new_code = code_sent_to(&mailer, "reader@example.com");

    if old_code != new_code {
        let response = request_token(&pool, &mailer, "reader", &old_code).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    let response = request_token(&pool, &mailer, "reader", &new_code).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Unknown username is a 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_token_unknown_user(pool: PgPool) {
    let mailer = Arc::new(MemoryMailer::new());
    let response = request_token(&pool, &mailer, "ghost", "AAAAAAAAAAAAAAAA").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Own profile
// ---------------------------------------------------------------------------

/// `PATCH /users/me` edits profile fields but never the role.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_me_ignores_role(pool: PgPool) {
    let (_user, token) = common::create_user(&pool, "reader", yamdb_core::roles::Role::User).await;
    let app = common::build_test_app(pool, Arc::new(MemoryMailer::new()));

    let body = json!({ "bio": "Reads a lot", "role": "admin", "username": "hijack" });
    let response = patch_json_auth(app, "/api/v1/users/me", body, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["bio"], "Reads a lot");
    assert_eq!(json["role"], "user");
    assert_eq!(json["username"], "reader");
}
