//! Handlers for link management endpoints (create, list, update, delete).

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde_json::json;

use crate::api::dto::auth::MessageResponse;
use crate::api::dto::links::{
    LinkInfo, LinkListResponse, LinksQuery, ShortenRequest, ShortenResponse, UpdateLinkRequest,
    UpdateLinkResponse,
};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "original_url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "short_url": "https://sho.rt/s/aZ3k9Q",
///   "short_code": "aZ3k9Q",
///   "original_url": "https://example.com/some/long/path"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is missing or empty.
/// Returns 503 Service Unavailable if no free code was found.
pub async fn shorten_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    let link = state
        .link_service
        .shorten(auth.user_id, &payload.original_url)
        .await?;

    Ok(Json(ShortenResponse {
        short_url: state.short_url(&link.short_code),
        short_code: link.short_code,
        original_url: link.original_url,
    }))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&limit=10&search=docs`
///
/// # Query Parameters
///
/// - `page` - 1-based page number (default 1)
/// - `limit` - page size, clamped to 1..=100 (default 10)
/// - `search` - case-insensitive filter on original URL or short code
///
/// # Errors
///
/// Returns 400 Bad Request if `page` or `limit` is not an integer.
pub async fn list_links_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    query: Result<Query<LinksQuery>, QueryRejection>,
) -> Result<Json<LinkListResponse>, AppError> {
    let Query(query) = query?;
    let page = state
        .link_service
        .list(
            auth.user_id,
            query.pagination.to_request(),
            query.search.as_deref(),
        )
        .await?;

    Ok(Json(page.into()))
}

/// Changes the destination of one of the caller's links.
///
/// # Endpoint
///
/// `PUT /api/links/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the link does not exist.
/// Returns 403 Forbidden if another user owns it.
/// Returns 400 Bad Request if the body is unreadable or the new URL is not an
/// absolute URL. Body errors are only reported to the link's owner.
pub async fn update_link_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLinkRequest>, JsonRejection>,
) -> Result<Json<UpdateLinkResponse>, AppError> {
    let link_id = parse_link_id(&id)?;

    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            state
                .link_service
                .check_update_access(auth.user_id, link_id)
                .await?;
            return Err(rejection.into());
        }
    };

    let link = state
        .link_service
        .update(auth.user_id, link_id, &payload.original_url)
        .await?;

    Ok(Json(UpdateLinkResponse {
        message: "URL updated successfully".to_string(),
        data: LinkInfo::from(link),
    }))
}

/// Deletes one of the caller's links and its analytics.
///
/// # Endpoint
///
/// `DELETE /api/links/{id}`
///
/// # Errors
///
/// Returns 404 Not Found if the link does not exist.
/// Returns 403 Forbidden if another user owns it.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .link_service
        .delete(auth.user_id, parse_link_id(&id)?)
        .await?;

    Ok(Json(MessageResponse::new("URL deleted successfully")))
}

fn parse_link_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::bad_request("Invalid link id", json!({ "id": raw })))
}
