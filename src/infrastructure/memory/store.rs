//! In-process storage for users, links and clicks.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Click, ClickCursor, Link, NewClick, NewLink, NewUser, User, UserPatch};
use crate::domain::repositories::{ClickRepository, LinkQuery, LinkRepository, UserRepository};
use crate::error::AppError;

/// Implements every storage repository on top of [`DashMap`].
///
/// Unique columns (`users.email`, `links.short_code`) are mirrored in index
/// maps and claimed through the `entry` API, so two concurrent inserts of the
/// same key cannot both succeed. Never hold a guard from one map while
/// touching the same map again: DashMap shard locks are not reentrant.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: DashMap<i64, User>,
    emails: DashMap<String, i64>,
    links: DashMap<i64, Link>,
    codes: DashMap<String, i64>,
    clicks: DashMap<i64, Click>,
    user_seq: AtomicI64,
    link_seq: AtomicI64,
    click_seq: AtomicI64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(seq: &AtomicI64) -> i64 {
        seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn matches_search(link: &Link, needle: Option<&str>) -> bool {
        match needle {
            None => true,
            Some(needle) => {
                link.original_url.to_lowercase().contains(needle)
                    || link.short_code.to_lowercase().contains(needle)
            }
        }
    }

    fn owner_links(&self, query: &LinkQuery) -> Vec<Link> {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut links: Vec<Link> = self
            .links
            .iter()
            .filter(|l| l.user_id == query.user_id)
            .filter(|l| Self::matches_search(l, needle.as_deref()))
            .map(|l| l.value().clone())
            .collect();

        links.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        links
    }

    fn link_clicks(&self, link_id: i64) -> Vec<Click> {
        let mut clicks: Vec<Click> = self
            .clicks
            .iter()
            .filter(|c| c.link_id == link_id)
            .map(|c| c.value().clone())
            .collect();

        clicks.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        clicks
    }

    fn remove_clicks_where(&self, predicate: impl Fn(&Click) -> bool) -> u64 {
        let ids: Vec<i64> = self
            .clicks
            .iter()
            .filter(|c| predicate(c.value()))
            .map(|c| *c.key())
            .collect();

        ids.into_iter()
            .filter(|id| self.clicks.remove(id).is_some())
            .count() as u64
    }
}

fn window<T>(items: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        match self.emails.entry(new_user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Email already registered",
                json!({ "constraint": "users_email_key" }),
            )),
            Entry::Vacant(slot) => {
                let user = User {
                    id: Self::next_id(&self.user_seq),
                    username: new_user.username,
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    created_at: Utc::now(),
                };
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        Ok(users)
    }

    async fn update_profile(&self, id: i64, patch: UserPatch) -> Result<User, AppError> {
        let current = self
            .users
            .get(&id)
            .map(|u| u.value().clone())
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))?;

        if let Some(email) = patch.email.as_ref().filter(|e| **e != current.email) {
            let taken = match self.emails.entry(email.clone()) {
                Entry::Occupied(owner) => *owner.get() != id,
                Entry::Vacant(slot) => {
                    slot.insert(id);
                    false
                }
            };
            if taken {
                return Err(AppError::conflict(
                    "Email already registered",
                    json!({ "constraint": "users_email_key" }),
                ));
            }
            self.emails.remove(&current.email);
        }

        let mut user = self
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("User not found", json!({ "id": id })))?;
        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        Ok(user.value().clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        match self.users.remove(&id) {
            Some((_, user)) => {
                self.emails.remove(&user.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        // Mirrors the `links.user_id` foreign key.
        if !self.users.contains_key(&new_link.user_id) {
            return Err(AppError::internal("Database error", json!({})));
        }

        match self.codes.entry(new_link.short_code.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Short code already in use",
                json!({ "constraint": "links_short_code_key" }),
            )),
            Entry::Vacant(slot) => {
                let link = Link::new(
                    Self::next_id(&self.link_seq),
                    new_link.original_url,
                    new_link.short_code,
                    new_link.user_id,
                    0,
                    Utc::now(),
                );
                self.links.insert(link.id, link.clone());
                slot.insert(link.id);
                Ok(link)
            }
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(&id).map(|l| l.value().clone()))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let Some(id) = self.codes.get(code).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.links.get(&id).map(|l| l.value().clone()))
    }

    async fn list_by_owner(&self, query: &LinkQuery) -> Result<Vec<Link>, AppError> {
        Ok(window(self.owner_links(query), query.offset, query.limit))
    }

    async fn count_by_owner(&self, query: &LinkQuery) -> Result<i64, AppError> {
        Ok(self.owner_links(query).len() as i64)
    }

    async fn update_url(&self, id: i64, original_url: &str) -> Result<Link, AppError> {
        let mut link = self
            .links
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;
        link.original_url = original_url.to_string();
        Ok(link.value().clone())
    }

    async fn increment_clicks(&self, id: i64) -> Result<(), AppError> {
        // The shard write lock makes the read-modify-write atomic.
        let mut link = self
            .links
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))?;
        link.click_count += 1;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        match self.links.remove(&id) {
            Some((_, link)) => {
                self.codes.remove(&link.short_code);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_owner(&self, user_id: i64) -> Result<u64, AppError> {
        let ids: Vec<i64> = self
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|l| *l.key())
            .collect();

        let mut removed = 0;
        for id in ids {
            if let Some((_, link)) = self.links.remove(&id) {
                self.codes.remove(&link.short_code);
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl ClickRepository for InMemoryStore {
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError> {
        if !self.links.contains_key(&new_click.link_id) {
            return Err(AppError::internal("Database error", json!({})));
        }

        let click = Click::new(
            Self::next_id(&self.click_seq),
            new_click.link_id,
            new_click.ip_address,
            new_click.referrer,
            new_click.user_agent,
            new_click.created_at,
        );
        self.clicks.insert(click.id, click.clone());
        Ok(click)
    }

    async fn list_by_link(
        &self,
        link_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Click>, AppError> {
        Ok(window(self.link_clicks(link_id), offset, limit))
    }

    async fn count_by_link(&self, link_id: i64) -> Result<i64, AppError> {
        Ok(self.clicks.iter().filter(|c| c.link_id == link_id).count() as i64)
    }

    async fn batch_after(
        &self,
        link_id: i64,
        after: Option<ClickCursor>,
        limit: i64,
    ) -> Result<Vec<Click>, AppError> {
        let clicks = self
            .link_clicks(link_id)
            .into_iter()
            .filter(|c| after.is_none_or(|cursor| cursor.precedes(c)))
            .collect();
        Ok(window(clicks, 0, limit))
    }

    async fn delete_by_link(&self, link_id: i64) -> Result<u64, AppError> {
        Ok(self.remove_clicks_where(|c| c.link_id == link_id))
    }

    async fn delete_by_owner(&self, user_id: i64) -> Result<u64, AppError> {
        let owned: HashSet<i64> = self
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|l| *l.key())
            .collect();

        Ok(self.remove_clicks_where(|c| owned.contains(&c.link_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: "alice".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    /// A store holding users with ids `1..=count`.
    async fn store_with_users(count: usize) -> InMemoryStore {
        let store = InMemoryStore::new();
        for i in 1..=count {
            UserRepository::create(&store, new_user(&format!("user{i}@x.io")))
                .await
                .unwrap();
        }
        store
    }

    fn new_link(code: &str, user_id: i64) -> NewLink {
        NewLink {
            original_url: format!("https://example.com/{code}"),
            short_code: code.to_string(),
            user_id,
        }
    }

    fn new_click(link_id: i64, at: chrono::DateTime<Utc>) -> NewClick {
        NewClick {
            link_id,
            ip_address: "10.0.0.1".to_string(),
            referrer: String::new(),
            user_agent: "test".to_string(),
            created_at: at,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let store = InMemoryStore::new();
        UserRepository::create(&store, new_user("a@x.io")).await.unwrap();

        let result = UserRepository::create(&store, new_user("a@x.io")).await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_code_is_conflict() {
        let store = store_with_users(2).await;
        LinkRepository::create(&store, new_link("abc123", 1)).await.unwrap();

        let result = LinkRepository::create(&store, new_link("abc123", 2)).await;
        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_profile_moves_email_index() {
        let store = InMemoryStore::new();
        let user = UserRepository::create(&store, new_user("old@x.io")).await.unwrap();

        let patch = UserPatch {
            username: None,
            email: Some("new@x.io".to_string()),
        };
        let updated = store.update_profile(user.id, patch).await.unwrap();

        assert_eq!(updated.email, "new@x.io");
        assert!(store.find_by_email("old@x.io").await.unwrap().is_none());
        assert_eq!(store.find_by_email("new@x.io").await.unwrap().unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_update_profile_rejects_taken_email() {
        let store = InMemoryStore::new();
        let a = UserRepository::create(&store, new_user("a@x.io")).await.unwrap();
        UserRepository::create(&store, new_user("b@x.io")).await.unwrap();

        let patch = UserPatch {
            username: None,
            email: Some("b@x.io".to_string()),
        };
        let result = store.update_profile(a.id, patch).await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
        assert_eq!(store.find_by_email("a@x.io").await.unwrap().unwrap().id, a.id);
    }

    #[tokio::test]
    async fn test_list_by_owner_filters_and_pages() {
        let store = store_with_users(2).await;
        for i in 0..5 {
            LinkRepository::create(&store, new_link(&format!("own{i:03}"), 1))
                .await
                .unwrap();
        }
        LinkRepository::create(&store, new_link("other1", 2)).await.unwrap();

        let query = LinkQuery {
            user_id: 1,
            search: None,
            offset: 0,
            limit: 3,
        };
        let page = store.list_by_owner(&query).await.unwrap();
        assert_eq!(page.len(), 3);
        assert!(page.iter().all(|l| l.user_id == 1));
        assert_eq!(store.count_by_owner(&query).await.unwrap(), 5);

        let search = LinkQuery {
            search: Some("OWN004".to_string()),
            ..query
        };
        let found = store.list_by_owner(&search).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].short_code, "own004");
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(store_with_users(1).await);
        let link = LinkRepository::create(store.as_ref(), new_link("hot001", 1))
            .await
            .unwrap();

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.increment_clicks(link.id).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let link = LinkRepository::find_by_id(store.as_ref(), link.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(link.click_count, 64);
    }

    #[tokio::test]
    async fn test_batch_after_walks_all_clicks_once() {
        let store = store_with_users(1).await;
        let link = LinkRepository::create(&store, new_link("clk001", 1)).await.unwrap();
        let base = Utc::now();
        for i in 0..7 {
            // Two clicks per instant to exercise the id tie-break.
            store
                .record(new_click(link.id, base + Duration::seconds(i / 2)))
                .await
                .unwrap();
        }

        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let batch = store.batch_after(link.id, cursor, 3).await.unwrap();
            if batch.is_empty() {
                break;
            }
            cursor = batch.last().map(Click::cursor);
            seen.extend(batch.into_iter().map(|c| c.id));
        }

        assert_eq!(seen, vec![7, 6, 5, 4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_record_for_missing_link_fails() {
        let store = InMemoryStore::new();
        let result = store.record(new_click(99, Utc::now())).await;
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_link_for_missing_owner_fails() {
        let store = store_with_users(1).await;
        UserRepository::delete(&store, 1).await.unwrap();

        let result = LinkRepository::create(&store, new_link("orphan", 1)).await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
        assert!(store.find_by_code("orphan").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_by_owner_keeps_other_users_data() {
        let store = store_with_users(2).await;
        let mine = LinkRepository::create(&store, new_link("mine01", 1)).await.unwrap();
        let theirs = LinkRepository::create(&store, new_link("their1", 2)).await.unwrap();
        store.record(new_click(mine.id, Utc::now())).await.unwrap();
        store.record(new_click(theirs.id, Utc::now())).await.unwrap();

        assert_eq!(ClickRepository::delete_by_owner(&store, 1).await.unwrap(), 1);
        assert_eq!(LinkRepository::delete_by_owner(&store, 1).await.unwrap(), 1);

        assert!(store.find_by_code("mine01").await.unwrap().is_none());
        assert!(store.find_by_code("their1").await.unwrap().is_some());
        assert_eq!(store.count_by_link(theirs.id).await.unwrap(), 1);
    }
}
