//! Repository for the `comments` table.

use sqlx::PgPool;
use yamdb_core::types::DbId;

use crate::models::comment::{Comment, CreateComment};

const SELECT_COMMENT: &str =
    "SELECT c.id, c.review_id, c.author_id, u.username AS author, c.text, c.pub_date";

pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                INSERT INTO comments (review_id, author_id, text)
                VALUES ($1, $2, $3)
                RETURNING *
             )
             {SELECT_COMMENT} FROM c JOIN users u ON u.id = c.author_id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.review_id)
            .bind(input.author_id)
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    /// Find a comment only if it belongs to `review_id`.
    pub async fn find_in_review(
        pool: &PgPool,
        review_id: DbId,
        comment_id: DbId,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "{SELECT_COMMENT} FROM comments c JOIN users u ON u.id = c.author_id
             WHERE c.id = $1 AND c.review_id = $2"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(comment_id)
            .bind(review_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_review(
        pool: &PgPool,
        review_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "{SELECT_COMMENT} FROM comments c JOIN users u ON u.id = c.author_id
             WHERE c.review_id = $1
             ORDER BY c.id
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(review_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_review(pool: &PgPool, review_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE review_id = $1")
            .bind(review_id)
            .fetch_one(pool)
            .await
    }

    /// Replace the comment text. Returns `None` if the comment does not exist.
    pub async fn update_text(
        pool: &PgPool,
        id: DbId,
        text: &str,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                UPDATE comments SET text = $2 WHERE id = $1 RETURNING *
             )
             {SELECT_COMMENT} FROM c JOIN users u ON u.id = c.author_id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(text)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
