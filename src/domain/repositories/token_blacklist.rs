//! Revocation set for session tokens.

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Set of revoked session tokens, shared by every request.
///
/// Entries are keyed by a token digest (see
/// [`crate::application::services::AuthService`]), never by the raw token.
/// Implementations must tolerate concurrent `revoke` and `is_revoked` calls
/// without serializing readers.
///
/// # Implementations
///
/// - [`crate::infrastructure::memory::InMemoryTokenBlacklist`] - sharded in-process set
/// - [`crate::infrastructure::persistence::PgTokenBlacklist`] - PostgreSQL table
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    /// Marks a token as revoked. Revoking an already revoked token is a no-op.
    ///
    /// `expires_at` is the token's own expiry; after it the entry is dead
    /// weight and may be purged by backends that support it.
    async fn revoke(&self, token_digest: &str, expires_at: DateTime<Utc>)
    -> Result<(), AppError>;

    /// Returns true if the token has been revoked.
    async fn is_revoked(&self, token_digest: &str) -> Result<bool, AppError>;
}
