//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /s/{code}`    - Short link redirect (public)
//! - `GET  /health`      - Health check (public)
//! - `/auth/*`           - Registration and login (public), logout (Bearer token)
//! - `/api/*`            - Link, analytics and account management (Bearer token)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - Bearer token with blacklist check
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

/// All routes with tracing and authentication, without path normalization.
///
/// `HEAD /s/{code}` is answered by the `GET` route and counts as a click.
pub fn router(state: AppState) -> Router {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/s/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(api::routes::public_routes())
        .merge(protected)
        .with_state(state)
        .layer(tracing::layer())
}
