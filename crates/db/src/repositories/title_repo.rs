//! Repository for the `titles` table and its `genre_title` links.

use std::collections::HashMap;

use sqlx::PgPool;
use yamdb_core::types::DbId;

use crate::models::taxonomy::TermRef;
use crate::models::title::{
    CreateTitle, TitleFilter, TitleGenreRow, TitleResponse, TitleRow, UpdateTitle,
};

/// Title columns joined with the category and the mean review score.
const SELECT_TITLE: &str = "SELECT t.id, t.name, t.year, t.description, \
        c.name AS category_name, c.slug AS category_slug, \
        (SELECT AVG(r.score)::float8 FROM reviews r WHERE r.title_id = t.id) AS rating \
     FROM titles t \
     LEFT JOIN categories c ON c.id = t.category_id";

/// Filter clause for list/count. Binds `$1` name, `$2` year, `$3` genre slug,
/// `$4` category slug; a `NULL` bind disables that filter.
const FILTER: &str = "WHERE ($1::text IS NULL OR strpos(lower(t.name), lower($1)) > 0) \
       AND ($2::int IS NULL OR t.year = $2) \
       AND ($3::text IS NULL OR EXISTS ( \
            SELECT 1 FROM genre_title gt JOIN genres g ON g.id = gt.genre_id \
            WHERE gt.title_id = t.id AND g.slug = $3)) \
       AND ($4::text IS NULL OR c.slug = $4)";

pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title with its genre links in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateTitle) -> Result<TitleResponse, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::link_genres(&mut tx, id, &input.genre_ids).await?;
        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TitleResponse>, sqlx::Error> {
        let query = format!("{SELECT_TITLE} WHERE t.id = $1");
        let row = sqlx::query_as::<_, TitleRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(row) => Ok(Self::attach_genres(pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List titles ordered by id.
    pub async fn list(
        pool: &PgPool,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TitleResponse>, sqlx::Error> {
        let query = format!("{SELECT_TITLE} {FILTER} ORDER BY t.id LIMIT $5 OFFSET $6");
        let rows = sqlx::query_as::<_, TitleRow>(&query)
            .bind(&filter.name)
            .bind(filter.year)
            .bind(&filter.genre)
            .bind(&filter.category)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;

        Self::attach_genres(pool, rows).await
    }

    pub async fn count(pool: &PgPool, filter: &TitleFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM titles t LEFT JOIN categories c ON c.id = t.category_id {FILTER}"
        );
        sqlx::query_scalar(&query)
            .bind(&filter.name)
            .bind(filter.year)
            .bind(&filter.genre)
            .bind(&filter.category)
            .fetch_one(pool)
            .await
    }

    /// Apply a partial update. Returns `None` if the title does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTitle,
    ) -> Result<Option<TitleResponse>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                category_id = COALESCE($6, category_id)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.year)
        .bind(input.description.is_some())
        .bind(input.description.as_ref().and_then(|d| d.as_deref()))
        .bind(input.category_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(genre_ids) = &input.genre_ids {
            sqlx::query("DELETE FROM genre_title WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::link_genres(&mut tx, id, genre_ids).await?;
        }

        tx.commit().await?;
        Self::find_by_id(pool, id).await
    }

    /// Delete a title; reviews, comments and genre links go with it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn link_genres(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        title_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if genre_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO genre_title (title_id, genre_id)
             SELECT $1, UNNEST($2::bigint[])
             ON CONFLICT ON CONSTRAINT uq_genre_title_pair DO NOTHING",
        )
        .bind(title_id)
        .bind(genre_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Load the genres of every row in one query and build responses in the
    /// original row order.
    async fn attach_genres(
        pool: &PgPool,
        rows: Vec<TitleRow>,
    ) -> Result<Vec<TitleResponse>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let links = sqlx::query_as::<_, TitleGenreRow>(
            "SELECT gt.title_id, g.name, g.slug
             FROM genre_title gt
             JOIN genres g ON g.id = gt.genre_id
             WHERE gt.title_id = ANY($1)
             ORDER BY g.id",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut by_title: HashMap<DbId, Vec<TermRef>> = HashMap::new();
        for link in links {
            by_title.entry(link.title_id).or_default().push(TermRef {
                name: link.name,
                slug: link.slug,
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let genre = by_title.remove(&row.id).unwrap_or_default();
                TitleResponse::from_row(row, genre)
            })
            .collect())
    }
}
