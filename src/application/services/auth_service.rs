//! Account registration, login and session token validation.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::{TokenBlacklist, UserRepository};
use crate::error::AppError;
use crate::infrastructure::security::JwtKeys;
use crate::infrastructure::security::password::{hash_password, verify_password};
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

const BEARER_PREFIX: &str = "Bearer ";

/// Service for registering users, issuing session tokens and checking them.
///
/// Session tokens are HS256 JWTs. Revocation goes through the injected
/// [`TokenBlacklist`], keyed by an HMAC-SHA256 digest of the raw token so the
/// blacklist never holds a usable credential.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    blacklist: Arc<dyn TokenBlacklist>,
    keys: JwtKeys,
    bcrypt_cost: u32,
    signing_secret: String,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `users` - account storage
    /// - `blacklist` - revoked token set
    /// - `jwt_secret` - HS256 key, also used as the HMAC key for token digests
    /// - `token_ttl` - lifetime of issued tokens
    /// - `bcrypt_cost` - work factor for new password hashes
    pub fn new(
        users: Arc<dyn UserRepository>,
        blacklist: Arc<dyn TokenBlacklist>,
        jwt_secret: &str,
        token_ttl: Duration,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            blacklist,
            keys: JwtKeys::new(jwt_secret, token_ttl),
            bcrypt_cost,
            signing_secret: jwt_secret.to_string(),
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_token(&self, token: &str) -> Result<String, AppError> {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes()).map_err(|e| {
            tracing::error!(error = %e, "Invalid HMAC key");
            AppError::internal("Failed to hash token", json!({}))
        })?;
        mac.update(token.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] if password hashing fails.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict(
                "Email already registered",
                json!({ "email": email }),
            ));
        }

        let password_hash = hash_password(password.to_string(), self.bcrypt_cost).await?;

        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for an unknown email and for a wrong
    /// password alike.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let invalid = || AppError::unauthorized("Invalid email or password", json!({}));

        let user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;

        if !verify_password(password.to_string(), user.password_hash.clone()).await? {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(invalid());
        }

        let token = self.keys.issue(user.id)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok(token)
    }

    /// Authenticates an `Authorization` header value.
    ///
    /// Returns the user id carried by the token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the header is missing, is not a
    /// non-empty bearer credential, or carries an invalid token.
    pub async fn validate_request(&self, authorization: Option<&str>) -> Result<i64, AppError> {
        let header = authorization.ok_or_else(|| {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Missing authorization header" }))
        })?;

        let token = header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Expected a bearer token" }),
                )
            })?;

        self.validate_token(token).await
    }

    /// Checks signature, expiry and revocation of a raw token, then that its
    /// account still exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is malformed, signed with
    /// another key, expired, revoked, or its user has been deleted.
    pub async fn validate_token(&self, token: &str) -> Result<i64, AppError> {
        let claims = self.keys.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid or expired token" }))
        })?;

        let user_id = claims.user_id().ok_or_else(|| {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Invalid token subject" }))
        })?;

        if self.blacklist.is_revoked(&self.hash_token(token)?).await? {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Token has been revoked" }),
            ));
        }

        // Only the token that deleted an account is blacklisted; its siblings
        // stop here.
        if self.users.find_by_id(user_id).await?.is_none() {
            tracing::debug!(user_id, "Token rejected: account no longer exists");
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Account no longer exists" }),
            ));
        }

        Ok(user_id)
    }

    /// Revokes a token so it can no longer authenticate. Idempotent.
    ///
    /// The blacklist entry carries the token's own expiry when it can be read,
    /// otherwise one full TTL from now.
    pub async fn revoke_current_session(&self, token: &str) -> Result<(), AppError> {
        let expires_at = self
            .keys
            .verify(token)
            .map(|claims| claims.expires_at())
            .unwrap_or_else(|_| Utc::now() + self.keys.ttl());

        self.blacklist
            .revoke(&self.hash_token(token)?, expires_at)
            .await?;

        tracing::info!("Session token revoked");
        Ok(())
    }
}
