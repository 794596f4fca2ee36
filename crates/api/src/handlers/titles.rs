//! Handlers for the `/titles` resource.
//!
//! Reads are public. Writes require an admin and take genre and category
//! slugs, which are resolved to ids before touching the `titles` table.

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Deserializer};
use yamdb_core::error::CoreError;
use yamdb_core::paging::PageRequest;
use yamdb_core::types::DbId;
use yamdb_core::validation::{validate_name, validate_year};
use yamdb_db::models::taxonomy::Taxonomy;
use yamdb_db::models::title::{CreateTitle, TitleFilter, TitleResponse, UpdateTitle};
use yamdb_db::repositories::{TaxonomyRepo, TitleRepo};

use crate::error::AppResult;
use crate::extract::{JsonBody, PathParam, QueryParams};
use crate::middleware::rbac::RequireAdmin;
use crate::query::TitleListParams;
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /titles`.
#[derive(Debug, Deserialize)]
pub struct CreateTitleRequest {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    /// Genre slugs. At least one is required.
    pub genre: Vec<String>,
    /// Category slug.
    pub category: String,
}

/// Request body for `PATCH /titles/{title_id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    /// `null` clears the description; an absent key leaves it unchanged.
    #[serde(default, deserialize_with = "present_or_null")]
    pub description: Option<Option<String>>,
    /// Replaces the whole genre set when present.
    pub genre: Option<Vec<String>>,
    pub category: Option<String>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from a missing key
/// (`None`, via `#[serde(default)]`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles
///
/// Filters: `name` (substring), `year`, `genre` (slug), `category` (slug).
pub async fn list_titles(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    QueryParams(params): QueryParams<TitleListParams>,
) -> AppResult<Json<Page<TitleResponse>>> {
    let request = PageRequest::new(params.page, state.config.page_size)?;
    let filter = TitleFilter {
        name: params.name.filter(|s| !s.is_empty()),
        year: params.year,
        genre: params.genre.filter(|s| !s.is_empty()),
        category: params.category.filter(|s| !s.is_empty()),
    };

    let count = TitleRepo::count(&state.pool, &filter).await?;
    request.ensure_in_range(count)?;
    let titles = TitleRepo::list(&state.pool, &filter, request.limit(), request.offset()).await?;

    Ok(Json(Page::new(&uri, &request, count, titles)))
}

/// GET /api/v1/titles/{title_id}
pub async fn get_title(
    State(state): State<AppState>,
    PathParam(title_id): PathParam<DbId>,
) -> AppResult<Json<TitleResponse>> {
    let title = TitleRepo::find_by_id(&state.pool, title_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Title", title_id))?;
    Ok(Json(title))
}

/// POST /api/v1/titles
pub async fn create_title(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateTitleRequest>,
) -> AppResult<(StatusCode, Json<TitleResponse>)> {
    validate_name(&input.name)?;
    validate_year(input.year, Utc::now().year())?;
    if input.genre.is_empty() {
        return Err(CoreError::Validation("At least one genre is required".into()).into());
    }

    let category_id = resolve_category(&state, &input.category).await?;
    let genre_ids = resolve_genres(&state, &input.genre).await?;

    let title = TitleRepo::create(
        &state.pool,
        &CreateTitle {
            name: input.name,
            year: input.year,
            description: input.description,
            category_id: Some(category_id),
            genre_ids,
        },
    )
    .await?;

    tracing::info!(title_id = title.id, user_id = admin.user_id, "Title created");

    Ok((StatusCode::CREATED, Json(title)))
}

/// PATCH /api/v1/titles/{title_id}
pub async fn update_title(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    PathParam(title_id): PathParam<DbId>,
    JsonBody(input): JsonBody<UpdateTitleRequest>,
) -> AppResult<Json<TitleResponse>> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(year) = input.year {
        validate_year(year, Utc::now().year())?;
    }

    let category_id = match &input.category {
        Some(slug) => Some(resolve_category(&state, slug).await?),
        None => None,
    };
    let genre_ids = match &input.genre {
        Some(slugs) if slugs.is_empty() => {
            return Err(CoreError::Validation("At least one genre is required".into()).into());
        }
        Some(slugs) => Some(resolve_genres(&state, slugs).await?),
        None => None,
    };

    let update = UpdateTitle {
        name: input.name,
        year: input.year,
        description: input.description,
        category_id,
        genre_ids,
    };
    let title = TitleRepo::update(&state.pool, title_id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("Title", title_id))?;

    tracing::info!(title_id, user_id = admin.user_id, "Title updated");

    Ok(Json(title))
}

/// DELETE /api/v1/titles/{title_id}
pub async fn delete_title(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    PathParam(title_id): PathParam<DbId>,
) -> AppResult<StatusCode> {
    if !TitleRepo::delete(&state.pool, title_id).await? {
        return Err(CoreError::not_found("Title", title_id).into());
    }

    tracing::info!(title_id, user_id = admin.user_id, "Title deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Unknown slugs in a request body are a client error, not a missing resource.
async fn resolve_category(state: &AppState, slug: &str) -> AppResult<DbId> {
    let category = TaxonomyRepo::find_by_slug(&state.pool, Taxonomy::Category, slug)
        .await?
        .ok_or_else(|| CoreError::Validation(format!("Unknown category slug '{slug}'")))?;
    Ok(category.id)
}

async fn resolve_genres(state: &AppState, slugs: &[String]) -> AppResult<Vec<DbId>> {
    let mut wanted = slugs.to_vec();
    wanted.sort();
    wanted.dedup();

    let genres = TaxonomyRepo::find_by_slugs(&state.pool, Taxonomy::Genre, &wanted).await?;
    if genres.len() != wanted.len() {
        let unknown: Vec<&str> = wanted
            .iter()
            .filter(|slug| !genres.iter().any(|g| &g.slug == *slug))
            .map(String::as_str)
            .collect();
        return Err(CoreError::Validation(format!(
            "Unknown genre slug(s): {}",
            unknown.join(", ")
        ))
        .into());
    }

    Ok(genres.into_iter().map(|g| g.id).collect())
}
