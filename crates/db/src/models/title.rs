//! Title entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::DbId;

use super::taxonomy::TermRef;

/// A title joined with its category and aggregated rating.
#[derive(Debug, Clone, FromRow)]
pub struct TitleRow {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    /// Mean review score, `NULL` when the title has no reviews.
    pub rating: Option<f64>,
}

/// One `(title, genre)` link resolved to the genre's name and slug.
#[derive(Debug, Clone, FromRow)]
pub struct TitleGenreRow {
    pub title_id: DbId,
    pub name: String,
    pub slug: String,
}

/// Title as rendered in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct TitleResponse {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<TermRef>,
    pub category: Option<TermRef>,
}

impl TitleResponse {
    pub fn from_row(row: TitleRow, genre: Vec<TermRef>) -> Self {
        let category = match (row.category_name, row.category_slug) {
            (Some(name), Some(slug)) => Some(TermRef { name, slug }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            year: row.year,
            rating: row.rating,
            description: row.description,
            genre,
            category,
        }
    }
}

/// Filters accepted by the title list.
#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    pub year: Option<i32>,
    /// Genre slug.
    pub genre: Option<String>,
    /// Category slug.
    pub category: Option<String>,
}

/// DTO for inserting a title. Slugs are already resolved to ids.
#[derive(Debug, Clone)]
pub struct CreateTitle {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub genre_ids: Vec<DbId>,
}

/// DTO for a partial title update. `genre_ids`, when present, replaces the
/// whole genre set.
#[derive(Debug, Clone, Default)]
pub struct UpdateTitle {
    pub name: Option<String>,
    pub year: Option<i32>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub category_id: Option<DbId>,
    pub genre_ids: Option<Vec<DbId>>,
}
