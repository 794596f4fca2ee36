//! HTTP contract tests that never reach the database.
//!
//! The router runs on a lazily-connected pool; every request here is decided
//! by routing, authentication or input validation before any query is
//! issued.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete, get, get_auth, offline_app, patch_json, post_json, post_json_auth,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Anonymous writes are rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anonymous_catalogue_writes_return_401() {
    let body = json!({ "name": "Drama", "slug": "drama" });
    for uri in ["/api/v1/categories", "/api/v1/genres"] {
        let response = post_json(offline_app(), uri, body.clone()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "POST {uri}");
    }

    let response = delete(offline_app(), "/api/v1/genres/drama").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let title = json!({ "name": "Solaris", "year": 1972, "genre": ["drama"], "category": "films" });
    let response = post_json(offline_app(), "/api/v1/titles", title).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = delete(offline_app(), "/api/v1/titles/1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn anonymous_review_and_comment_writes_return_401() {
    let review = json!({ "text": "Great", "score": 9 });
    let response = post_json(offline_app(), "/api/v1/titles/1/reviews", review.clone()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = patch_json(offline_app(), "/api/v1/titles/1/reviews/1", review).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = delete(offline_app(), "/api/v1/titles/1/reviews/1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let comment = json!({ "text": "Agreed" });
    let response = post_json(
        offline_app(),
        "/api/v1/titles/1/reviews/1/comments",
        comment,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = delete(offline_app(), "/api/v1/titles/1/reviews/1/comments/1").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_endpoints_require_authentication() {
    let response = get(offline_app(), "/api/v1/users").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(offline_app(), "/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Missing Authorization header");
}

#[tokio::test]
async fn garbage_token_returns_401() {
    let response = get_auth(offline_app(), "/api/v1/users/me", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

// ---------------------------------------------------------------------------
// Category / genre detail
// ---------------------------------------------------------------------------

#[tokio::test]
async fn genre_and_category_detail_get_returns_405() {
    for uri in ["/api/v1/genres/drama", "/api/v1/categories/films"] {
        let response = get(offline_app(), uri).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "GET {uri}");

        let json = body_json(response).await;
        assert_eq!(json["code"], "METHOD_NOT_ALLOWED");
    }
}

#[tokio::test]
async fn anonymous_genre_patch_is_401_before_405() {
    let body = json!({ "name": "Renamed" });
    let response = patch_json(offline_app(), "/api/v1/genres/drama", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Signup / token validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn signup_rejects_reserved_username() {
    let body = json!({ "username": "me", "email": "me@example.com" });
    let response = post_json(offline_app(), "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn signup_rejects_bad_username_and_email() {
    let cases = [
        json!({ "username": "has space", "email": "ok@example.com" }),
        json!({ "username": "", "email": "ok@example.com" }),
        json!({ "username": "reader", "email": "not-an-email" }),
        json!({ "username": "u".repeat(151), "email": "ok@example.com" }),
    ];
    for body in cases {
        let response = post_json(offline_app(), "/api/v1/auth/signup", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
    }
}

#[tokio::test]
async fn signup_with_missing_field_is_400() {
    let body = json!({ "username": "reader" });
    let response = post_json(offline_app(), "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn token_requires_both_fields() {
    let body = json!({ "username": "reader", "confirmation_code": "" });
    let response = post_json(offline_app(), "/api/v1/auth/token", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Pagination and routing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn page_zero_returns_404() {
    for uri in ["/api/v1/genres?page=0", "/api/v1/titles?page=0"] {
        let response = get(offline_app(), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {uri}");
    }
}

#[tokio::test]
async fn non_numeric_ids_return_json_404() {
    for uri in [
        "/api/v1/titles/abc",
        "/api/v1/titles/abc/reviews",
        "/api/v1/titles/1/reviews/abc",
        "/api/v1/titles/1/reviews/1/comments/abc",
    ] {
        let response = get(offline_app(), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {uri}");

        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND", "GET {uri}");
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn non_numeric_page_returns_json_400() {
    for uri in [
        "/api/v1/genres?page=abc",
        "/api/v1/titles?page=abc",
        "/api/v1/titles?year=soon",
        "/api/v1/titles/1/reviews?page=abc",
    ] {
        let response = get(offline_app(), uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "GET {uri}");

        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST", "GET {uri}");
    }
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let response = get(offline_app(), "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let response = get(offline_app(), "/api/v1/genres/drama").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let response = get(offline_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["service"], "yamdb");
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["api"], "/api/v1");
    assert_eq!(json["db_healthy"], false);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn malformed_token_header_returns_401() {
    let body = json!({ "text": "Great", "score": 9 });
    let response = post_json_auth(offline_app(), "/api/v1/titles/1/reviews", body, "").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
