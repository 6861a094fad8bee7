//! In-memory token blacklist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashSet;

use crate::domain::repositories::TokenBlacklist;
use crate::error::AppError;

/// Revoked token digests held for the lifetime of the process.
///
/// Entries are never evicted; a restart forgets every revocation.
#[derive(Debug, Default)]
pub struct InMemoryTokenBlacklist {
    revoked: DashSet<String>,
}

impl InMemoryTokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

#[async_trait]
impl TokenBlacklist for InMemoryTokenBlacklist {
    async fn revoke(&self, token_digest: &str, _expires_at: DateTime<Utc>) -> Result<(), AppError> {
        self.revoked.insert(token_digest.to_string());
        Ok(())
    }

    async fn is_revoked(&self, token_digest: &str) -> Result<bool, AppError> {
        Ok(self.revoked.contains(token_digest))
    }
}
