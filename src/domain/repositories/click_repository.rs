//! Repository trait for click analytics.

use crate::domain::entities::{Click, ClickCursor, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for recording and reading click events.
///
/// Clicks are append-only: there is no update operation, and deletion only
/// happens as part of a link or user cascade.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Records a new click event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors (including a link that
    /// vanished between lookup and insert).
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Returns one page of a link's clicks, newest first.
    async fn list_by_link(
        &self,
        link_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Click>, AppError>;

    /// Counts all clicks of a link.
    async fn count_by_link(&self, link_id: i64) -> Result<i64, AppError>;

    /// Returns up to `limit` clicks that sort after `after`, newest first.
    ///
    /// With `after = None` the batch starts at the newest click. Used to stream
    /// exports without holding the full result set.
    async fn batch_after(
        &self,
        link_id: i64,
        after: Option<ClickCursor>,
        limit: i64,
    ) -> Result<Vec<Click>, AppError>;

    /// Deletes all clicks of a link, returning how many were removed.
    async fn delete_by_link(&self, link_id: i64) -> Result<u64, AppError>;

    /// Deletes all clicks of every link owned by a user.
    async fn delete_by_owner(&self, user_id: i64) -> Result<u64, AppError>;
}
