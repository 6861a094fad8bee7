//! Handlers for the caller's own account.

use axum::{Json, extract::State};

use crate::api::dto::auth::MessageResponse;
use crate::api::dto::user::{UpdateProfileRequest, UpdateProfileResponse};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Updates username and/or email. Blank fields are ignored.
///
/// # Endpoint
///
/// `PUT /api/user/update`
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed email.
/// Returns 409 Conflict if the email belongs to another account.
pub async fn update_profile_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>, AppError> {
    let user = state
        .user_service
        .update_profile(
            auth.user_id,
            payload.username.as_deref(),
            payload.email.as_deref(),
        )
        .await?;

    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully".to_string(),
        username: user.username,
        email: user.email,
    }))
}

/// Permanently deletes the caller's account, links and clicks, and revokes
/// the token used for the request.
///
/// # Endpoint
///
/// `DELETE /api/user`
pub async fn delete_user_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .user_service
        .delete_account(auth.user_id, Some(&auth.token))
        .await?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
