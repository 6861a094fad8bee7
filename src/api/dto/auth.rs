//! DTOs for registration, login and logout.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

/// Request body for `POST /auth/register`.
///
/// Username and email are checked as they will be stored, after trimming.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "trimmed_username"))]
    pub username: String,

    #[validate(custom(function = "trimmed_email"))]
    pub email: String,

    /// bcrypt only looks at the first 72 bytes.
    #[validate(length(min = 6, max = 72, message = "Password must be 6-72 characters"))]
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

fn trimmed_username(value: &str) -> Result<(), ValidationError> {
    match value.trim().chars().count() {
        1..=64 => Ok(()),
        _ => Err(ValidationError::new("length")
            .with_message("Username must be 1-64 characters".into())),
    }
}

fn trimmed_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("Invalid email address".into()))
    }
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Plain confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
