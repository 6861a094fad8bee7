//! Paged click analytics for a link's owner.

use std::sync::Arc;

use crate::domain::entities::{Click, Link};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use serde_json::json;

/// A link summary plus one page of its clicks.
#[derive(Debug, Clone)]
pub struct AnalyticsPage {
    pub link: Link,
    pub clicks: Page<Click>,
}

/// Service for reading click analytics.
pub struct AnalyticsService {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
}

impl AnalyticsService {
    pub fn new(links: Arc<dyn LinkRepository>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { links, clicks }
    }

    /// Returns the link behind `code` and a page of its clicks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or belongs to
    /// another user. The two cases are indistinguishable to the caller.
    pub async fn get_analytics(
        &self,
        user_id: i64,
        code: &str,
        page: PageRequest,
    ) -> Result<AnalyticsPage, AppError> {
        let link = find_owned_by_code(self.links.as_ref(), user_id, code).await?;

        let total = self.clicks.count_by_link(link.id).await?;
        let items = self
            .clicks
            .list_by_link(link.id, page.offset(), page.limit())
            .await?;

        Ok(AnalyticsPage {
            link,
            clicks: Page::new(items, total, page),
        })
    }
}

/// Looks up a link by code, hiding links that belong to someone else.
pub(crate) async fn find_owned_by_code(
    links: &dyn LinkRepository,
    user_id: i64,
    code: &str,
) -> Result<Link, AppError> {
    links
        .find_by_code(code)
        .await?
        .filter(|link| link.is_owned_by(user_id))
        .ok_or_else(|| AppError::not_found("URL not found", json!({ "code": code })))
}
