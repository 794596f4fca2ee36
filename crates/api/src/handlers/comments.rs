//! Handlers for `/titles/{title_id}/reviews/{review_id}/comments`.

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use yamdb_core::error::CoreError;
use yamdb_core::paging::PageRequest;
use yamdb_core::permissions::can_modify_authored;
use yamdb_core::types::DbId;
use yamdb_core::validation::validate_text;
use yamdb_db::models::comment::{Comment, CreateComment};
use yamdb_db::repositories::CommentRepo;

use super::reviews::find_review;
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::Page;
use crate::state::AppState;

/// Request body for creating or editing a comment.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam((title_id, review_id)): PathParam<(DbId, DbId)>,
    QueryParams(params): QueryParams<PageParams>,
) -> AppResult<Json<Page<Comment>>> {
    let review = find_review(&state, title_id, review_id).await?;

    let request = PageRequest::new(params.page, state.config.page_size)?;
    let count = CommentRepo::count_for_review(&state.pool, review.id).await?;
    request.ensure_in_range(count)?;
    let comments =
        CommentRepo::list_for_review(&state.pool, review.id, request.limit(), request.offset())
            .await?;

    Ok(Json(Page::new(&uri, &request, count, comments)))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    PathParam((title_id, review_id)): PathParam<(DbId, DbId)>,
    JsonBody(input): JsonBody<CommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let review = find_review(&state, title_id, review_id).await?;
    validate_text(&input.text)?;

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            review_id: review.id,
            author_id: auth.user_id,
            text: input.text,
        },
    )
    .await?;

    tracing::info!(
        comment_id = comment.id,
        review_id,
        user_id = auth.user_id,
        "Comment created",
    );

    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_comment(
    State(state): State<AppState>,
    PathParam((title_id, review_id, comment_id)): PathParam<(DbId, DbId, DbId)>,
) -> AppResult<Json<Comment>> {
    let comment = find_comment(&state, title_id, review_id, comment_id).await?;
    Ok(Json(comment))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn update_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    PathParam((title_id, review_id, comment_id)): PathParam<(DbId, DbId, DbId)>,
    JsonBody(input): JsonBody<CommentRequest>,
) -> AppResult<Json<Comment>> {
    let comment = find_comment(&state, title_id, review_id, comment_id).await?;
    ensure_can_modify(&auth, &comment)?;
    validate_text(&input.text)?;

    let comment = CommentRepo::update_text(&state.pool, comment.id, &input.text)
        .await?
        .ok_or_else(|| CoreError::not_found("Comment", comment_id))?;

    tracing::info!(comment_id, review_id, user_id = auth.user_id, "Comment updated");

    Ok(Json(comment))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn delete_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    PathParam((title_id, review_id, comment_id)): PathParam<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    let comment = find_comment(&state, title_id, review_id, comment_id).await?;
    ensure_can_modify(&auth, &comment)?;

    if !CommentRepo::delete(&state.pool, comment.id).await? {
        return Err(CoreError::not_found("Comment", comment_id).into());
    }

    tracing::info!(comment_id, review_id, user_id = auth.user_id, "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_comment(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
    comment_id: DbId,
) -> AppResult<Comment> {
    let review = find_review(state, title_id, review_id).await?;
    CommentRepo::find_in_review(&state.pool, review.id, comment_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Comment", comment_id)))
}

fn ensure_can_modify(auth: &AuthUser, comment: &Comment) -> AppResult<()> {
    if !can_modify_authored(&auth.actor(), comment.author_id) {
        return Err(CoreError::Forbidden(
            "Only the author, a moderator or an admin may change this comment".into(),
        )
        .into());
    }
    Ok(())
}
