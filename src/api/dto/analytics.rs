//! DTOs for link analytics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::pagination::PaginationMeta;
use crate::application::services::AnalyticsPage;
use crate::domain::entities::Click;

/// A single recorded click.
#[derive(Debug, Serialize)]
pub struct ClickInfo {
    pub id: i64,
    pub url_id: i64,
    pub ip_address: String,
    pub referrer: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

impl From<Click> for ClickInfo {
    fn from(click: Click) -> Self {
        Self {
            id: click.id,
            url_id: click.link_id,
            ip_address: click.ip_address,
            referrer: click.referrer,
            user_agent: click.user_agent,
            created_at: click.created_at,
        }
    }
}

/// Response for `GET /api/links/{code}/analytics`.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub short_code: String,
    pub original_url: String,
    pub click_count: i64,
    pub analytics: Vec<ClickInfo>,
    pub pagination: PaginationMeta,
}

impl From<AnalyticsPage> for AnalyticsResponse {
    fn from(page: AnalyticsPage) -> Self {
        let pagination = PaginationMeta::from(&page.clicks);
        Self {
            short_code: page.link.short_code,
            original_url: page.link.original_url,
            click_count: page.link.click_count,
            analytics: page.clicks.items.into_iter().map(ClickInfo::from).collect(),
            pagination,
        }
    }
}
