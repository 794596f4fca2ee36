//! Handlers for `/categories` and `/genres`.
//!
//! Both resources support list, create and delete only. The detail route
//! exists so that `GET`, `PUT` and `PATCH` on a slug answer 405 rather than
//! 404; writes still require an admin before the 405 is reported.

use axum::extract::{OriginalUri, State};
use axum::http::{StatusCode, Uri};
use axum::Json;
use serde::Deserialize;
use yamdb_core::error::CoreError;
use yamdb_core::paging::PageRequest;
use yamdb_core::validation::{validate_name, validate_slug};
use yamdb_db::models::taxonomy::{CreateTerm, Taxonomy, TermRef};
use yamdb_db::repositories::TaxonomyRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::SearchParams;
use crate::response::Page;
use crate::state::AppState;

/// Request body for creating a category or genre.
#[derive(Debug, Deserialize)]
pub struct CreateTermRequest {
    pub name: String,
    pub slug: String,
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    QueryParams(params): QueryParams<SearchParams>,
) -> AppResult<Json<Page<TermRef>>> {
    list_terms(&state, Taxonomy::Category, &uri, &params).await
}

/// POST /api/v1/categories
pub async fn create_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateTermRequest>,
) -> AppResult<(StatusCode, Json<TermRef>)> {
    create_term(&state, Taxonomy::Category, &admin, input).await
}

/// DELETE /api/v1/categories/{slug}
pub async fn delete_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    PathParam(slug): PathParam<String>,
) -> AppResult<StatusCode> {
    delete_term(&state, Taxonomy::Category, &admin, &slug).await
}

// ---------------------------------------------------------------------------
// Genres
// ---------------------------------------------------------------------------

/// GET /api/v1/genres
pub async fn list_genres(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    QueryParams(params): QueryParams<SearchParams>,
) -> AppResult<Json<Page<TermRef>>> {
    list_terms(&state, Taxonomy::Genre, &uri, &params).await
}

/// POST /api/v1/genres
pub async fn create_genre(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateTermRequest>,
) -> AppResult<(StatusCode, Json<TermRef>)> {
    create_term(&state, Taxonomy::Genre, &admin, input).await
}

/// DELETE /api/v1/genres/{slug}
pub async fn delete_genre(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    PathParam(slug): PathParam<String>,
) -> AppResult<StatusCode> {
    delete_term(&state, Taxonomy::Genre, &admin, &slug).await
}

// ---------------------------------------------------------------------------
// Unsupported detail methods
// ---------------------------------------------------------------------------

/// GET /api/v1/{categories,genres}/{slug}
pub async fn retrieve_not_allowed() -> AppError {
    AppError::Core(CoreError::MethodNotAllowed)
}

/// PUT|PATCH /api/v1/{categories,genres}/{slug}
pub async fn update_not_allowed(RequireAdmin(_admin): RequireAdmin) -> AppError {
    AppError::Core(CoreError::MethodNotAllowed)
}

// ---------------------------------------------------------------------------
// Shared implementation
// ---------------------------------------------------------------------------

async fn list_terms(
    state: &AppState,
    taxonomy: Taxonomy,
    uri: &Uri,
    params: &SearchParams,
) -> AppResult<Json<Page<TermRef>>> {
    let request = PageRequest::new(params.page, state.config.page_size)?;
    let search = params.term();

    let count = TaxonomyRepo::count(&state.pool, taxonomy, search).await?;
    request.ensure_in_range(count)?;
    let terms =
        TaxonomyRepo::list(&state.pool, taxonomy, search, request.limit(), request.offset())
            .await?;

    let results = terms.into_iter().map(TermRef::from).collect();
    Ok(Json(Page::new(uri, &request, count, results)))
}

async fn create_term(
    state: &AppState,
    taxonomy: Taxonomy,
    admin: &AuthUser,
    input: CreateTermRequest,
) -> AppResult<(StatusCode, Json<TermRef>)> {
    validate_name(&input.name)?;
    validate_slug(&input.slug)?;

    let term = TaxonomyRepo::create(
        &state.pool,
        taxonomy,
        &CreateTerm {
            name: input.name,
            slug: input.slug,
        },
    )
    .await?;

    tracing::info!(
        term_id = term.id,
        table = taxonomy.table(),
        slug = %term.slug,
        user_id = admin.user_id,
        "Term created",
    );

    Ok((StatusCode::CREATED, Json(term.into())))
}

async fn delete_term(
    state: &AppState,
    taxonomy: Taxonomy,
    admin: &AuthUser,
    slug: &str,
) -> AppResult<StatusCode> {
    let id = TaxonomyRepo::delete_by_slug(&state.pool, taxonomy, slug)
        .await?
        .ok_or_else(|| CoreError::not_found(taxonomy.entity(), slug))?;

    tracing::info!(
        term_id = id,
        table = taxonomy.table(),
        user_id = admin.user_id,
        "Term deleted",
    );

    Ok(StatusCode::NO_CONTENT)
}
