//! Handlers for registration, login and logout.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::auth::{LoginRequest, MessageResponse, RegisterRequest, TokenResponse};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a new account.
///
/// # Endpoint
///
/// `POST /auth/register`
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "email": "alice@example.com", "password": "hunter22" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if validation fails.
/// Returns 409 Conflict if the email is already registered.
pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    state
        .auth_service
        .register(payload.username.trim(), payload.email.trim(), &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "User registered successfully. Please login.",
        )),
    ))
}

/// Exchanges credentials for a session token.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Errors
///
/// Returns 401 Unauthorized for an unknown email or a wrong password.
pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state
        .auth_service
        .login(payload.email.trim(), &payload.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// Revokes the token used to make this request.
///
/// # Endpoint
///
/// `POST /auth/logout`
pub async fn logout_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .auth_service
        .revoke_current_session(&auth.token)
        .await?;

    Ok(Json(MessageResponse::new("Logged out successfully")))
}
