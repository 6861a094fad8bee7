//! Link creation, listing, update and deletion for a link's owner.

use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::pagination::{Page, PageRequest};
use crate::domain::repositories::{ClickRepository, LinkQuery, LinkRepository};
use crate::error::AppError;
use crate::utils::code_generator::{SHORT_CODE_LENGTH, generate_code};
use serde_json::json;

/// Generated codes tried before giving up on a shorten request.
pub const MAX_CODE_ATTEMPTS: usize = 5;

/// Longest accepted original URL, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// Which owner operation a permission check is guarding.
#[derive(Debug, Clone, Copy)]
enum OwnerAction {
    Update,
    Delete,
}

impl OwnerAction {
    fn verb(self) -> &'static str {
        match self {
            OwnerAction::Update => "update",
            OwnerAction::Delete => "delete",
        }
    }
}

/// Service for managing a user's short links.
///
/// Every mutating operation checks existence first and ownership second, so
/// a foreign link id answers 403 while an unknown one answers 404.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(links: Arc<dyn LinkRepository>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { links, clicks }
    }

    /// Creates a short link for `original_url`.
    ///
    /// The same URL may be shortened any number of times; each call gets a
    /// fresh code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is empty.
    /// Returns [`AppError::Exhausted`] if [`MAX_CODE_ATTEMPTS`] generated codes
    /// all collided with existing ones.
    pub async fn shorten(&self, user_id: i64, original_url: &str) -> Result<Link, AppError> {
        let original_url = original_url.trim();
        if original_url.is_empty() {
            return Err(AppError::bad_request("URL is required", json!({})));
        }

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let new_link = NewLink {
                original_url: original_url.to_string(),
                short_code: generate_code(SHORT_CODE_LENGTH),
                user_id,
            };

            match self.links.create(new_link).await {
                Ok(link) => {
                    tracing::info!(
                        user_id,
                        link_id = link.id,
                        code = %link.short_code,
                        "Short link created"
                    );
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => {
                    tracing::warn!(attempt, "Short code collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::exhausted(
            "Failed to generate unique code",
            json!({ "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    /// Lists the user's links, newest first.
    ///
    /// A non-blank `search` keeps only links whose original URL or short code
    /// contains it, ignoring case. Pages past the end come back empty.
    pub async fn list(
        &self,
        user_id: i64,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<Page<Link>, AppError> {
        let query = LinkQuery {
            user_id,
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            offset: page.offset(),
            limit: page.limit(),
        };

        let total = self.links.count_by_owner(&query).await?;
        let items = self.links.list_by_owner(&query).await?;

        Ok(Page::new(items, total, page))
    }

    /// Replaces the original URL of one of the user's links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    /// Returns [`AppError::Forbidden`] if another user owns it.
    /// Returns [`AppError::Validation`] unless `new_url` is an absolute URL
    /// with a host and at most [`MAX_URL_LENGTH`] characters.
    pub async fn update(&self, user_id: i64, link_id: i64, new_url: &str) -> Result<Link, AppError> {
        self.owned_link(user_id, link_id, OwnerAction::Update).await?;

        let new_url = validate_url(new_url)?;
        let link = self.links.update_url(link_id, &new_url).await?;

        tracing::info!(user_id, link_id, "Link updated");
        Ok(link)
    }

    /// Deletes one of the user's links together with its clicks.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist.
    /// Returns [`AppError::Forbidden`] if another user owns it.
    pub async fn delete(&self, user_id: i64, link_id: i64) -> Result<(), AppError> {
        self.owned_link(user_id, link_id, OwnerAction::Delete).await?;

        let clicks = self.clicks.delete_by_link(link_id).await?;
        self.links.delete(link_id).await?;

        tracing::info!(user_id, link_id, clicks, "Link deleted");
        Ok(())
    }

    /// Runs the existence and ownership checks of [`Self::update`] alone.
    ///
    /// Lets the HTTP layer rank an unreadable request body below 404 and 403.
    pub async fn check_update_access(&self, user_id: i64, link_id: i64) -> Result<(), AppError> {
        self.owned_link(user_id, link_id, OwnerAction::Update)
            .await
            .map(|_| ())
    }

    async fn owned_link(
        &self,
        user_id: i64,
        link_id: i64,
        action: OwnerAction,
    ) -> Result<Link, AppError> {
        let link = self
            .links
            .find_by_id(link_id)
            .await?
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "id": link_id })))?;

        if !link.is_owned_by(user_id) {
            return Err(AppError::forbidden(
                format!("You do not have permission to {} this URL", action.verb()),
                json!({ "id": link_id }),
            ));
        }

        Ok(link)
    }
}

/// Accepts only absolute URLs with a host, returned trimmed.
fn validate_url(raw: &str) -> Result<String, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::bad_request("URL is required", json!({})));
    }

    if raw.chars().count() > MAX_URL_LENGTH {
        return Err(AppError::bad_request(
            format!("URL must be at most {MAX_URL_LENGTH} characters"),
            json!({ "max": MAX_URL_LENGTH }),
        ));
    }

    let parsed = url::Url::parse(raw).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
    })?;

    if !parsed.has_host() {
        return Err(AppError::bad_request(
            "Invalid URL format",
            json!({ "reason": "URL must include a host" }),
        ));
    }

    Ok(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use chrono::Utc;

    fn create_test_link(id: i64, code: &str, url: &str, user_id: i64) -> Link {
        Link::new(id, url.to_string(), code.to_string(), user_id, 0, Utc::now())
    }

    fn service(links: MockLinkRepository, clicks: MockClickRepository) -> LinkService {
        LinkService::new(Arc::new(links), Arc::new(clicks))
    }

    fn conflict() -> AppError {
        AppError::conflict("taken", json!({ "constraint": "links_short_code_key" }))
    }

    #[tokio::test]
    async fn test_shorten_success() {
        let mut links = MockLinkRepository::new();
        links
            .expect_create()
            .withf(|l| {
                l.original_url == "https://example.com"
                    && l.user_id == 3
                    && l.short_code.len() == SHORT_CODE_LENGTH
            })
            .times(1)
            .returning(|l| Ok(create_test_link(1, &l.short_code, &l.original_url, l.user_id)));

        let svc = service(links, MockClickRepository::new());
        let link = svc.shorten(3, "  https://example.com ").await.unwrap();

        assert_eq!(link.original_url, "https://example.com");
        assert_eq!(link.click_count, 0);
    }

    #[tokio::test]
    async fn test_shorten_rejects_empty_url() {
        let mut links = MockLinkRepository::new();
        links.expect_create().times(0);

        let svc = service(links, MockClickRepository::new());

        for input in ["", "   "] {
            let result = svc.shorten(1, input).await;
            assert!(matches!(result, Err(AppError::Validation { .. })));
        }
    }

    #[tokio::test]
    async fn test_shorten_retries_on_collision() {
        let mut links = MockLinkRepository::new();
        let mut seq = mockall::Sequence::new();
        links
            .expect_create()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(conflict()));
        links
            .expect_create()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|l| Ok(create_test_link(9, &l.short_code, &l.original_url, l.user_id)));

        let svc = service(links, MockClickRepository::new());
        let link = svc.shorten(1, "https://example.com").await.unwrap();

        assert_eq!(link.id, 9);
    }

    #[tokio::test]
    async fn test_shorten_gives_up_after_max_attempts() {
        let mut links = MockLinkRepository::new();
        links
            .expect_create()
            .times(MAX_CODE_ATTEMPTS)
            .returning(|_| Err(conflict()));

        let svc = service(links, MockClickRepository::new());
        let result = svc.shorten(1, "https://example.com").await;

        assert!(matches!(result, Err(AppError::Exhausted { .. })));
    }

    #[tokio::test]
    async fn test_shorten_does_not_retry_other_errors() {
        let mut links = MockLinkRepository::new();
        links
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let svc = service(links, MockClickRepository::new());
        let result = svc.shorten(1, "https://example.com").await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_list_builds_query_and_metadata() {
        let mut links = MockLinkRepository::new();
        links
            .expect_count_by_owner()
            .withf(|q| q.user_id == 4 && q.search.as_deref() == Some("docs"))
            .times(1)
            .returning(|_| Ok(25));
        links
            .expect_list_by_owner()
            .withf(|q| q.offset == 20 && q.limit == 10)
            .times(1)
            .returning(|_| {
                Ok((0..5)
                    .map(|i| create_test_link(i, "abc123", "https://docs.rs", 4))
                    .collect())
            });

        let svc = service(links, MockClickRepository::new());
        let page = svc
            .list(4, PageRequest::new(Some(3), Some(10)), Some(" docs "))
            .await
            .unwrap();

        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 3);
        assert_eq!(page.items.len(), 5);
    }

    #[tokio::test]
    async fn test_list_blank_search_is_no_filter() {
        let mut links = MockLinkRepository::new();
        links
            .expect_count_by_owner()
            .withf(|q| q.search.is_none())
            .returning(|_| Ok(0));
        links
            .expect_list_by_owner()
            .withf(|q| q.search.is_none())
            .returning(|_| Ok(vec![]));

        let svc = service(links, MockClickRepository::new());
        let page = svc.list(4, PageRequest::default(), Some("  ")).await.unwrap();

        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_update_success() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_link(id, "abc123", "https://old.io", 1))));
        links
            .expect_update_url()
            .withf(|id, url| *id == 5 && url == "https://new.io/path")
            .times(1)
            .returning(|id, url| Ok(create_test_link(id, "abc123", url, 1)));

        let svc = service(links, MockClickRepository::new());
        let link = svc.update(1, 5, "https://new.io/path").await.unwrap();

        assert_eq!(link.original_url, "https://new.io/path");
        assert_eq!(link.short_code, "abc123");
    }

    #[tokio::test]
    async fn test_update_checks_existence_before_ownership() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_id().returning(|_| Ok(None));
        links.expect_update_url().times(0);

        let svc = service(links, MockClickRepository::new());
        let result = svc.update(1, 5, "not a url").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_foreign_link_is_forbidden() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_link(id, "abc123", "https://old.io", 2))));
        links.expect_update_url().times(0);

        let svc = service(links, MockClickRepository::new());
        let err = svc.update(1, 5, "https://new.io").await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
        assert_eq!(err.to_string(), "You do not have permission to update this URL");
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_url() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_link(id, "abc123", "https://old.io", 1))));
        links.expect_update_url().times(0);

        let svc = service(links, MockClickRepository::new());

        for input in ["", "not a url", "mailto:a@b.c", "/relative/path"] {
            let result = svc.update(1, 5, input).await;
            assert!(
                matches!(result, Err(AppError::Validation { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_update_rejects_overlong_url_only_for_owner() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_link(id, "abc123", "https://old.io", 1))));
        links.expect_update_url().times(0);

        let svc = service(links, MockClickRepository::new());
        let long_url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));

        let own = svc.update(1, 5, &long_url).await;
        assert!(matches!(own, Err(AppError::Validation { .. })));

        let foreign = svc.update(2, 5, &long_url).await;
        assert!(matches!(foreign, Err(AppError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_check_update_access() {
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .withf(|id| *id == 5)
            .returning(|id| Ok(Some(create_test_link(id, "abc123", "https://old.io", 1))));
        links
            .expect_find_by_id()
            .withf(|id| *id != 5)
            .returning(|_| Ok(None));

        let svc = service(links, MockClickRepository::new());

        assert!(svc.check_update_access(1, 5).await.is_ok());
        assert!(matches!(
            svc.check_update_access(2, 5).await,
            Err(AppError::Forbidden { .. })
        ));
        assert!(matches!(
            svc.check_update_access(1, 6).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_clicks_first() {
        let mut seq = mockall::Sequence::new();
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();

        links
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_link(id, "abc123", "https://old.io", 1))));
        clicks
            .expect_delete_by_link()
            .withf(|id| *id == 5)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(3));
        links
            .expect_delete()
            .withf(|id| *id == 5)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));

        let svc = service(links, clicks);
        svc.delete(1, 5).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_foreign_link_is_forbidden() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();
        links
            .expect_find_by_id()
            .returning(|id| Ok(Some(create_test_link(id, "abc123", "https://old.io", 2))));
        links.expect_delete().times(0);
        clicks.expect_delete_by_link().times(0);

        let svc = service(links, clicks);
        let err = svc.delete(1, 5).await.unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
        assert_eq!(err.to_string(), "You do not have permission to delete this URL");
    }
}
