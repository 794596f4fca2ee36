//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?page=` only. Used by the nested review and comment lists.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
}

/// `?page=&search=`. Used by the category, genre and user lists.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub page: Option<i64>,
    pub search: Option<String>,
}

impl SearchParams {
    /// The search term, with an empty `?search=` treated as absent.
    pub fn term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

/// `?page=&name=&year=&genre=&category=` for the title list.
#[derive(Debug, Default, Deserialize)]
pub struct TitleListParams {
    pub page: Option<i64>,
    pub name: Option<String>,
    pub year: Option<i32>,
    /// Genre slug.
    pub genre: Option<String>,
    /// Category slug.
    pub category: Option<String>,
}
