//! Bearer token authentication middleware and the [`AuthUser`] extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// The authenticated caller, available to handlers behind [`layer`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    /// The raw bearer token, kept so the session can revoke itself.
    pub token: String,
}

/// Authenticates requests using Bearer tokens from Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Read the `Authorization` header
/// 2. Verify signature and expiry of the JWT
/// 3. Check the token against the blacklist
/// 4. Check that the account still exists
/// 5. Attach [`AuthUser`] to the request and continue
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing or malformed, or the
/// token is invalid, expired or revoked, or its account was deleted.
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/api/links", get(list_links_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let user_id = st
        .auth_service
        .validate_request(authorization.as_deref())
        .await?;

    let token = authorization
        .as_deref()
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    req.extensions_mut().insert(AuthUser { user_id, token });

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })
    }
}
