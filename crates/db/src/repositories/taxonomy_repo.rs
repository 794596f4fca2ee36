//! Repository for the `categories` and `genres` tables.
//!
//! Table names come from [`Taxonomy::table`], never from user input.

use sqlx::PgPool;
use yamdb_core::types::DbId;

use crate::models::taxonomy::{CreateTerm, Taxonomy, Term};

const COLUMNS: &str = "id, name, slug, created_at, updated_at";

pub struct TaxonomyRepo;

impl TaxonomyRepo {
    pub async fn create(
        pool: &PgPool,
        taxonomy: Taxonomy,
        input: &CreateTerm,
    ) -> Result<Term, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}",
            taxonomy.table()
        );
        sqlx::query_as::<_, Term>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        taxonomy: Taxonomy,
        slug: &str,
    ) -> Result<Option<Term>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE slug = $1",
            taxonomy.table()
        );
        sqlx::query_as::<_, Term>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a set of slugs. Unknown slugs are simply absent from the result.
    pub async fn find_by_slugs(
        pool: &PgPool,
        taxonomy: Taxonomy,
        slugs: &[String],
    ) -> Result<Vec<Term>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {} WHERE slug = ANY($1) ORDER BY id",
            taxonomy.table()
        );
        sqlx::query_as::<_, Term>(&query)
            .bind(slugs)
            .fetch_all(pool)
            .await
    }

    /// List terms ordered by id, optionally filtered by a name substring.
    pub async fn list(
        pool: &PgPool,
        taxonomy: Taxonomy,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Term>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {}
             WHERE ($1::text IS NULL OR strpos(lower(name), lower($1)) > 0)
             ORDER BY id
             LIMIT $2 OFFSET $3",
            taxonomy.table()
        );
        sqlx::query_as::<_, Term>(&query)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(
        pool: &PgPool,
        taxonomy: Taxonomy,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM {}
             WHERE ($1::text IS NULL OR strpos(lower(name), lower($1)) > 0)",
            taxonomy.table()
        );
        sqlx::query_scalar(&query).bind(search).fetch_one(pool).await
    }

    /// Delete by slug. Titles in a deleted category keep existing with no
    /// category; genre links are removed by cascade.
    ///
    /// Returns the id of the deleted row, if any.
    pub async fn delete_by_slug(
        pool: &PgPool,
        taxonomy: Taxonomy,
        slug: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let query = format!(
            "DELETE FROM {} WHERE slug = $1 RETURNING id",
            taxonomy.table()
        );
        sqlx::query_scalar(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }
}
