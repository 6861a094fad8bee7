//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user accounts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryStore`] - in-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Finds a user by email (exact match).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists all users, oldest first.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Applies a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    /// Returns [`AppError::Conflict`] if the new email belongs to another user.
    async fn update_profile(&self, id: i64, patch: UserPatch) -> Result<User, AppError>;

    /// Hard-deletes a user. Links and clicks must already be gone.
    ///
    /// Returns `Ok(false)` if no user had this ID.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
