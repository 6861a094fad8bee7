//! Short code resolution with click recording.

use chrono::Utc;
use std::sync::Arc;

use crate::domain::entities::NewClick;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use serde_json::json;

/// What is known about the visitor following a short link.
///
/// Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientInfo {
    pub ip_address: String,
    pub referrer: String,
    pub user_agent: String,
}

/// Service behind the public redirect endpoint.
///
/// Analytics are best-effort: a failed click insert or counter update is
/// logged and counted, and the visitor is still redirected.
pub struct RedirectService {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
}

impl RedirectService {
    pub fn new(links: Arc<dyn LinkRepository>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { links, clicks }
    }

    /// Resolves `code` to its original URL, recording the click on the way.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Internal`] if the lookup itself fails.
    pub async fn resolve(&self, code: &str, client: ClientInfo) -> Result<String, AppError> {
        let link = self
            .links
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "code": code })))?;

        let click = NewClick {
            link_id: link.id,
            ip_address: client.ip_address,
            referrer: client.referrer,
            user_agent: client.user_agent,
            created_at: Utc::now(),
        };

        if let Err(e) = self.clicks.record(click).await {
            metrics::counter!("click_record_failures_total", "stage" => "record").increment(1);
            tracing::warn!(link_id = link.id, error = %e, "Failed to record click");
        }

        if let Err(e) = self.links.increment_clicks(link.id).await {
            metrics::counter!("click_record_failures_total", "stage" => "counter").increment(1);
            tracing::warn!(link_id = link.id, error = %e, "Failed to increment click count");
        }

        metrics::counter!("redirects_total").increment(1);
        tracing::debug!(code, link_id = link.id, "Redirecting");

        Ok(link.original_url)
    }
}
