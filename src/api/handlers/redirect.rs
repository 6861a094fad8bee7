//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::application::services::ClientInfo;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /s/{code}` (HEAD is answered the same way, without a body)
///
/// # Request Flow
///
/// 1. Look up the link by code
/// 2. Record a click (IP, referrer, user agent); failures are logged only
/// 3. Increment the link's click counter atomically
/// 4. Return 302 Found with `Location`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 500 if the stored URL cannot be sent as a header value.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    client: ClientInfo,
) -> Result<impl IntoResponse, AppError> {
    let target = state.redirect_service.resolve(&code, client).await?;

    let location = HeaderValue::from_str(&target).map_err(|e| {
        tracing::error!(code = %code, error = %e, "Stored URL is not a valid Location header");
        AppError::internal("Invalid redirect target", json!({}))
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}
