//! Review entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

/// A review joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub title_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    /// Author's username.
    pub author: String,
    pub text: String,
    pub score: i32,
    pub pub_date: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateReview {
    pub title_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub score: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateReview {
    pub text: Option<String>,
    pub score: Option<i32>,
}
