//! Handlers for click analytics and CSV export.

use axum::{
    Json,
    body::Body,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::analytics::AnalyticsResponse;
use crate::api::dto::pagination::PageParams;
use crate::api::middleware::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns a link summary and one page of its clicks.
///
/// # Endpoint
///
/// `GET /api/links/{code}/analytics?page=1&limit=10`
///
/// # Response
///
/// ```json
/// {
///   "short_code": "aZ3k9Q",
///   "original_url": "https://example.com",
///   "click_count": 42,
///   "analytics": [
///     { "id": 42, "url_id": 7, "ip_address": "203.0.113.7", "referrer": "",
///       "user_agent": "curl/8.0", "created_at": "2024-03-09T14:05:06Z" }
///   ],
///   "pagination": { "page": 1, "limit": 10, "total": 42, "totalPages": 5 }
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or not owned by the caller.
/// Returns 400 Bad Request if `page` or `limit` is not an integer.
pub async fn analytics_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code): Path<String>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let Query(params) = params?;
    let page = state
        .analytics_service
        .get_analytics(auth.user_id, &code, params.to_request())
        .await?;

    Ok(Json(page.into()))
}

/// Streams every click of a link as a CSV attachment.
///
/// # Endpoint
///
/// `GET /api/links/{code}/export`
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or not owned by the caller.
/// A storage failure after streaming started aborts the body.
pub async fn export_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code): Path<String>,
) -> Result<Response, AppError> {
    let export = state.export_service.export_csv(auth.user_id, &code).await?;

    let disposition = HeaderValue::from_str(&format!("attachment; filename={}", export.filename))
        .map_err(|e| {
            AppError::internal("Invalid export file name", json!({ "reason": e.to_string() }))
        })?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(export.body),
    )
        .into_response())
}
