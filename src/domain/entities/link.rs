//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL owned by a single user.
///
/// `short_code` is globally unique. `click_count` only grows, and only the
/// redirect path increments it.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub user_id: i64,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        user_id: i64,
        click_count: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            user_id,
            click_count,
            created_at,
        }
    }

    /// Returns true if `user_id` owns this link.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Input data for creating a new link. New links always start with zero clicks.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub original_url: String,
    pub short_code: String,
    pub user_id: i64,
}
