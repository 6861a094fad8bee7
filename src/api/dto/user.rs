//! DTOs for profile management.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

/// Request body for `PUT /api/user/update`.
///
/// Absent or blank fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 64, message = "Username must be at most 64 characters"))]
    pub username: Option<String>,

    #[validate(custom(function = "blank_or_email"))]
    pub email: Option<String>,
}

fn blank_or_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("Invalid email address".into()))
    }
}

/// Response for `PUT /api/user/update`.
#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub username: String,
    pub email: String,
}
