//! Handlers for `/titles/{title_id}/reviews`.
//!
//! Anyone may read. Any authenticated user may post one review per title.
//! Edits and deletes are limited to the author and staff.

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use yamdb_core::error::CoreError;
use yamdb_core::paging::PageRequest;
use yamdb_core::permissions::can_modify_authored;
use yamdb_core::types::DbId;
use yamdb_core::validation::{validate_score, validate_text};
use yamdb_db::models::review::{CreateReview, Review, UpdateReview};
use yamdb_db::repositories::{ReviewRepo, TitleRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::Page;
use crate::state::AppState;

/// Request body for `POST .../reviews`.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub score: i32,
}

/// Request body for `PATCH .../reviews/{review_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub score: Option<i32>,
}

/// GET /api/v1/titles/{title_id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(title_id): PathParam<DbId>,
    QueryParams(params): QueryParams<PageParams>,
) -> AppResult<Json<Page<Review>>> {
    ensure_title_exists(&state, title_id).await?;

    let request = PageRequest::new(params.page, state.config.page_size)?;
    let count = ReviewRepo::count_for_title(&state.pool, title_id).await?;
    request.ensure_in_range(count)?;
    let reviews =
        ReviewRepo::list_for_title(&state.pool, title_id, request.limit(), request.offset())
            .await?;

    Ok(Json(Page::new(&uri, &request, count, reviews)))
}

/// POST /api/v1/titles/{title_id}/reviews
pub async fn create_review(
    auth: AuthUser,
    State(state): State<AppState>,
    PathParam(title_id): PathParam<DbId>,
    JsonBody(input): JsonBody<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    ensure_title_exists(&state, title_id).await?;
    validate_text(&input.text)?;
    validate_score(input.score)?;

    // The unique constraint still catches a concurrent duplicate and maps it
    // to the same 400.
    if ReviewRepo::exists_for_author(&state.pool, title_id, auth.user_id).await? {
        return Err(CoreError::Validation("You have already reviewed this title".into()).into());
    }

    let review = ReviewRepo::create(
        &state.pool,
        &CreateReview {
            title_id,
            author_id: auth.user_id,
            text: input.text,
            score: input.score,
        },
    )
    .await?;

    tracing::info!(
        review_id = review.id,
        title_id,
        user_id = auth.user_id,
        score = review.score,
        "Review created",
    );

    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn get_review(
    State(state): State<AppState>,
    PathParam((title_id, review_id)): PathParam<(DbId, DbId)>,
) -> AppResult<Json<Review>> {
    let review = find_review(&state, title_id, review_id).await?;
    Ok(Json(review))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn update_review(
    auth: AuthUser,
    State(state): State<AppState>,
    PathParam((title_id, review_id)): PathParam<(DbId, DbId)>,
    JsonBody(input): JsonBody<UpdateReviewRequest>,
) -> AppResult<Json<Review>> {
    let review = find_review(&state, title_id, review_id).await?;
    ensure_can_modify(&auth, &review)?;

    if let Some(text) = &input.text {
        validate_text(text)?;
    }
    if let Some(score) = input.score {
        validate_score(score)?;
    }

    let update = UpdateReview {
        text: input.text,
        score: input.score,
    };
    let review = ReviewRepo::update(&state.pool, review.id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("Review", review_id))?;

    tracing::info!(review_id, title_id, user_id = auth.user_id, "Review updated");

    Ok(Json(review))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn delete_review(
    auth: AuthUser,
    State(state): State<AppState>,
    PathParam((title_id, review_id)): PathParam<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let review = find_review(&state, title_id, review_id).await?;
    ensure_can_modify(&auth, &review)?;

    if !ReviewRepo::delete(&state.pool, review.id).await? {
        return Err(CoreError::not_found("Review", review_id).into());
    }

    tracing::info!(review_id, title_id, user_id = auth.user_id, "Review deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn ensure_title_exists(state: &AppState, title_id: DbId) -> AppResult<()> {
    if !TitleRepo::exists(&state.pool, title_id).await? {
        return Err(CoreError::not_found("Title", title_id).into());
    }
    Ok(())
}

/// Load a review, treating one that belongs to another title as missing.
pub(crate) async fn find_review(
    state: &AppState,
    title_id: DbId,
    review_id: DbId,
) -> AppResult<Review> {
    ensure_title_exists(state, title_id).await?;
    ReviewRepo::find_in_title(&state.pool, title_id, review_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Review", review_id)))
}

fn ensure_can_modify(auth: &AuthUser, review: &Review) -> AppResult<()> {
    if !can_modify_authored(&auth.actor(), review.author_id) {
        return Err(CoreError::Forbidden(
            "Only the author, a moderator or an admin may change this review".into(),
        )
        .into());
    }
    Ok(())
}
