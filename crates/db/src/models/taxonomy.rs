//! Categories and genres.
//!
//! Both tables have the same shape (`name` + unique `slug`) and the same API,
//! so they share one model and one repository keyed by [`Taxonomy`].

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

/// Which classification table a term lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taxonomy {
    Category,
    Genre,
}

impl Taxonomy {
    pub fn table(self) -> &'static str {
        match self {
            Taxonomy::Category => "categories",
            Taxonomy::Genre => "genres",
        }
    }

    /// Entity name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            Taxonomy::Category => "Category",
            Taxonomy::Genre => "Genre",
        }
    }
}

/// A row from `categories` or `genres`.
#[derive(Debug, Clone, FromRow)]
pub struct Term {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// `{name, slug}` as rendered in API responses, standalone or nested in a
/// title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct TermRef {
    pub name: String,
    pub slug: String,
}

impl From<Term> for TermRef {
    fn from(term: Term) -> Self {
        Self {
            name: term.name,
            slug: term.slug,
        }
    }
}

/// DTO for inserting a category or genre.
#[derive(Debug, Clone)]
pub struct CreateTerm {
    pub name: String,
    pub slug: String,
}
