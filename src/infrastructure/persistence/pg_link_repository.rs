//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{LinkQuery, LinkRepository};
use crate::error::AppError;

/// PostgreSQL repository for link storage and retrieval.
///
/// Short code uniqueness is the `links_short_code_key` constraint; a collision
/// surfaces as [`AppError::Conflict`] through the `sqlx::Error` conversion.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct LinkRow {
    id: i64,
    original_url: String,
    short_code: String,
    user_id: i64,
    click_count: i64,
    created_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link::new(
            r.id,
            r.original_url,
            r.short_code,
            r.user_id,
            r.click_count,
            r.created_at,
        )
    }
}

/// Builds an `ILIKE` pattern matching `term` literally anywhere in the column.
fn like_pattern(term: Option<&str>) -> Option<String> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;

    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            INSERT INTO links (original_url, short_code, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, original_url, short_code, user_id, click_count, created_at
            "#,
        )
        .bind(&new_link.original_url)
        .bind(&new_link.short_code)
        .bind(new_link.user_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, short_code, user_id, click_count, created_at
            FROM links
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, short_code, user_id, click_count, created_at
            FROM links
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Link::from))
    }

    async fn list_by_owner(&self, query: &LinkQuery) -> Result<Vec<Link>, AppError> {
        let rows = sqlx::query_as::<_, LinkRow>(
            r#"
            SELECT id, original_url, short_code, user_id, click_count, created_at
            FROM links
            WHERE user_id = $1
              AND ($2::text IS NULL OR original_url ILIKE $2 OR short_code ILIKE $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(query.user_id)
        .bind(like_pattern(query.search.as_deref()))
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn count_by_owner(&self, query: &LinkQuery) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM links
            WHERE user_id = $1
              AND ($2::text IS NULL OR original_url ILIKE $2 OR short_code ILIKE $2)
            "#,
        )
        .bind(query.user_id)
        .bind(like_pattern(query.search.as_deref()))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn update_url(&self, id: i64, original_url: &str) -> Result<Link, AppError> {
        let row = sqlx::query_as::<_, LinkRow>(
            r#"
            UPDATE links
            SET original_url = $2
            WHERE id = $1
            RETURNING id, original_url, short_code, user_id, click_count, created_at
            "#,
        )
        .bind(id)
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Link::from)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    async fn increment_clicks(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE links SET click_count = click_count + 1 WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Link not found", json!({ "id": id })));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_owner(&self, user_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
