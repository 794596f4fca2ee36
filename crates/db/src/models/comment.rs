//! Comment entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::{DbId, Timestamp};

/// A comment joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub review_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    pub author: String,
    pub text: String,
    pub pub_date: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateComment {
    pub review_id: DbId,
    pub author_id: DbId,
    pub text: String,
}
