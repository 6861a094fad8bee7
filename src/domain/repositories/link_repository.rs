//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Filter and window for listing one user's links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkQuery {
    pub user_id: i64,
    /// Case-insensitive substring matched against original URL or short code.
    pub search: Option<String>,
    pub offset: i64,
    pub limit: i64,
}

/// Repository interface for managing short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link with a click count of zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken. The
    /// check happens atomically with the insert.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its database ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Finds a link by its short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Lists a user's links newest first, honoring search, offset and limit.
    async fn list_by_owner(&self, query: &LinkQuery) -> Result<Vec<Link>, AppError>;

    /// Counts a user's links matching the query's search term.
    ///
    /// Offset and limit are ignored.
    async fn count_by_owner(&self, query: &LinkQuery) -> Result<i64, AppError>;

    /// Replaces the original URL of a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this ID.
    async fn update_url(&self, id: i64, original_url: &str) -> Result<Link, AppError>;

    /// Adds exactly one to the link's click count in a single atomic operation.
    async fn increment_clicks(&self, id: i64) -> Result<(), AppError>;

    /// Hard-deletes a link. Its clicks must already be gone.
    ///
    /// Returns `Ok(false)` if no link had this ID.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Hard-deletes every link owned by a user, returning how many were removed.
    async fn delete_by_owner(&self, user_id: i64) -> Result<u64, AppError>;
}
