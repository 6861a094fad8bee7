//! bcrypt password hashing.
//!
//! bcrypt is deliberately slow, so both operations run on the blocking pool.

use serde_json::json;

use crate::error::AppError;

/// Hashes a password with a fresh salt at the given cost.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if hashing fails or the blocking task panics.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing task failed");
            AppError::internal("Failed to hash password", json!({}))
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AppError::internal("Failed to hash password", json!({}))
        })
}

/// Checks a password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the stored hash is malformed.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password verification task failed");
            AppError::internal("Failed to verify password", json!({}))
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "Password verification failed");
            AppError::internal("Failed to verify password", json!({}))
        })
}
