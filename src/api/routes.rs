//! API route configuration.
//!
//! Routes here are split by whether they need a bearer token; the protected
//! set is wrapped in [`crate::api::middleware::auth::layer`] by the caller.

use crate::api::handlers::{
    analytics_handler, delete_link_handler, delete_user_handler, export_handler,
    list_links_handler, login_handler, logout_handler, register_handler, shorten_handler,
    update_link_handler, update_profile_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Account routes that work without a token.
///
/// # Endpoints
///
/// - `POST /auth/register` - Create an account
/// - `POST /auth/login`    - Exchange credentials for a token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
}

/// Routes that require `Authorization: Bearer <token>`.
///
/// # Endpoints
///
/// - `POST   /auth/logout`               - Revoke the current token
/// - `POST   /api/shorten`               - Create a short link
/// - `GET    /api/links`                 - List own links (paged, searchable)
/// - `PUT    /api/links/{id}`            - Change a link's destination
/// - `DELETE /api/links/{id}`            - Delete a link and its clicks
/// - `GET    /api/links/{code}/analytics` - Paged clicks of a link
/// - `GET    /api/links/{code}/export`   - All clicks of a link as CSV
/// - `PUT    /api/user/update`           - Update username / email
/// - `DELETE /api/user`                  - Delete the account
///
/// `{id}` and `{code}` share one path segment, so both are captured as
/// `{link}`; handlers interpret it.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout_handler))
        .route("/api/shorten", post(shorten_handler))
        .route("/api/links", get(list_links_handler))
        .route(
            "/api/links/{link}",
            put(update_link_handler).delete(delete_link_handler),
        )
        .route("/api/links/{link}/analytics", get(analytics_handler))
        .route("/api/links/{link}/export", get(export_handler))
        .route("/api/user", delete(delete_user_handler))
        .route("/api/user/update", put(update_profile_handler))
}
