//! Self-service account management.

use std::sync::Arc;

use crate::application::services::AuthService;
use crate::domain::entities::{User, UserPatch};
use crate::domain::repositories::{ClickRepository, LinkRepository, UserRepository};
use crate::error::AppError;
use serde_json::json;

/// Rows removed by an account deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionSummary {
    pub links: u64,
    pub clicks: u64,
}

/// Service for profile updates and account deletion.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
    auth: Arc<AuthService>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        links: Arc<dyn LinkRepository>,
        clicks: Arc<dyn ClickRepository>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self {
            users,
            links,
            clicks,
            auth,
        }
    }

    /// Updates username and/or email. Blank values leave the field unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    /// Returns [`AppError::Conflict`] if the email belongs to another account.
    pub async fn update_profile(
        &self,
        user_id: i64,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<User, AppError> {
        let non_blank = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let patch = UserPatch {
            username: non_blank(username),
            email: non_blank(email),
        };

        if patch.is_empty() {
            return self
                .users
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| AppError::not_found("User not found", json!({ "id": user_id })));
        }

        if let Some(email) = patch.email.as_deref()
            && let Some(existing) = self.users.find_by_email(email).await?
            && existing.id != user_id
        {
            return Err(AppError::conflict(
                "Email already registered",
                json!({ "email": email }),
            ));
        }

        let user = self.users.update_profile(user_id, patch).await?;
        tracing::info!(user_id, "Profile updated");
        Ok(user)
    }

    /// Permanently deletes the account with all its links and clicks, then
    /// revokes `token` so the session that asked for the deletion ends too.
    ///
    /// Steps run in order without a transaction; a failure part-way leaves
    /// the earlier deletions in place.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    pub async fn delete_account(
        &self,
        user_id: i64,
        token: Option<&str>,
    ) -> Result<DeletionSummary, AppError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found(
                "User not found",
                json!({ "id": user_id }),
            ));
        }

        let clicks = self.clicks.delete_by_owner(user_id).await?;
        let links = self.links.delete_by_owner(user_id).await?;
        self.users.delete(user_id).await?;

        if let Some(token) = token {
            self.auth.revoke_current_session(token).await?;
        }

        tracing::info!(user_id, links, clicks, "Account deleted");
        Ok(DeletionSummary { links, clicks })
    }
}
