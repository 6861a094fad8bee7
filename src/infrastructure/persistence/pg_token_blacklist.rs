//! PostgreSQL implementation of the token blacklist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::TokenBlacklist;
use crate::error::AppError;

/// Revoked token digests persisted across restarts and shared by replicas.
///
/// Raw tokens are never stored, only their keyed digest.
pub struct PgTokenBlacklist {
    pool: Arc<PgPool>,
}

impl PgTokenBlacklist {
    /// Creates a new blacklist with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Deletes entries whose token has expired anyway. Returns rows removed.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= NOW()")
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl TokenBlacklist for PgTokenBlacklist {
    async fn revoke(&self, token_digest: &str, expires_at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (token_hash, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (token_hash) DO NOTHING
            "#,
        )
        .bind(token_digest)
        .bind(expires_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn is_revoked(&self, token_digest: &str) -> Result<bool, AppError> {
        let revoked: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE token_hash = $1)",
        )
        .bind(token_digest)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(revoked)
    }
}
