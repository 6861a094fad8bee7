//! PostgreSQL implementation of click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Click, ClickCursor, NewClick};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// PostgreSQL repository for click analytics.
///
/// Reads use the `(link_id, created_at DESC, id DESC)` index for both offset
/// pages and keyset batches.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    ip_address: String,
    referrer: String,
    user_agent: String,
    created_at: DateTime<Utc>,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click::new(
            r.id,
            r.link_id,
            r.ip_address,
            r.referrer,
            r.user_agent,
            r.created_at,
        )
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO link_clicks (link_id, ip_address, referrer, user_agent, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, link_id, ip_address, referrer, user_agent, created_at
            "#,
        )
        .bind(new_click.link_id)
        .bind(&new_click.ip_address)
        .bind(&new_click.referrer)
        .bind(&new_click.user_agent)
        .bind(new_click.created_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn list_by_link(
        &self,
        link_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Click>, AppError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, link_id, ip_address, referrer, user_agent, created_at
            FROM link_clicks
            WHERE link_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(link_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }

    async fn count_by_link(&self, link_id: i64) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM link_clicks WHERE link_id = $1")
            .bind(link_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn batch_after(
        &self,
        link_id: i64,
        after: Option<ClickCursor>,
        limit: i64,
    ) -> Result<Vec<Click>, AppError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, link_id, ip_address, referrer, user_agent, created_at
            FROM link_clicks
            WHERE link_id = $1
              AND ($2::timestamptz IS NULL OR (created_at, id) < ($2, $3))
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            "#,
        )
        .bind(link_id)
        .bind(after.map(|c| c.created_at))
        .bind(after.map(|c| c.id))
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Click::from).collect())
    }

    async fn delete_by_link(&self, link_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM link_clicks WHERE link_id = $1")
            .bind(link_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_by_owner(&self, user_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM link_clicks
            WHERE link_id IN (SELECT id FROM links WHERE user_id = $1)
            "#,
        )
        .bind(user_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }
}
