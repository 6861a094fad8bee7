//! DTOs for link creation, listing and update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::pagination::PageParams;
use crate::domain::entities::Link;
use crate::domain::pagination::Page;

/// Request body for `POST /api/shorten`.
///
/// Emptiness is checked by the service after trimming.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(length(max = 2048, message = "URL must be at most 2048 characters"))]
    pub original_url: String,
}

/// Response for `POST /api/shorten`.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,
}

/// JSON representation of a link.
#[derive(Debug, Serialize)]
pub struct LinkInfo {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub user_id: i64,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Link> for LinkInfo {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url,
            short_code: link.short_code,
            user_id: link.user_id,
            click_count: link.click_count,
            created_at: link.created_at,
        }
    }
}

/// Query parameters for `GET /api/links`.
#[derive(Debug, Deserialize)]
pub struct LinksQuery {
    #[serde(flatten)]
    pub pagination: PageParams,

    pub search: Option<String>,
}

/// Response for `GET /api/links`.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub data: Vec<LinkInfo>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl From<Page<Link>> for LinkListResponse {
    fn from(page: Page<Link>) -> Self {
        Self {
            data: page.items.into_iter().map(LinkInfo::from).collect(),
            total: page.total,
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
        }
    }
}

/// Request body for `PUT /api/links/{id}`.
///
/// The URL is checked by the service after existence and ownership.
#[derive(Debug, Deserialize)]
pub struct UpdateLinkRequest {
    #[serde(default)]
    pub original_url: String,
}

/// Response for `PUT /api/links/{id}`.
#[derive(Debug, Serialize)]
pub struct UpdateLinkResponse {
    pub message: String,
    pub data: LinkInfo,
}
