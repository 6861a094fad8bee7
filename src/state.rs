//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{
    AnalyticsService, AuthService, ExportService, LinkService, RedirectService, UserService,
};
use crate::config::{BlacklistBackend, Config};
use crate::domain::repositories::{ClickRepository, LinkRepository, TokenBlacklist, UserRepository};
use crate::infrastructure::memory::{InMemoryStore, InMemoryTokenBlacklist};
use crate::infrastructure::persistence::{
    PgClickRepository, PgLinkRepository, PgTokenBlacklist, PgUserRepository,
};

/// The storage backends the services are built on.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub links: Arc<dyn LinkRepository>,
    pub clicks: Arc<dyn ClickRepository>,
    pub blacklist: Arc<dyn TokenBlacklist>,
}

impl Repositories {
    /// Everything in process memory. Used by tests and local experiments.
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            links: store.clone(),
            clicks: store,
            blacklist: Arc::new(InMemoryTokenBlacklist::new()),
        }
    }

    /// PostgreSQL repositories with the chosen token blacklist backend.
    pub fn postgres(pool: Arc<PgPool>, blacklist: BlacklistBackend) -> Self {
        let blacklist: Arc<dyn TokenBlacklist> = match blacklist {
            BlacklistBackend::Memory => Arc::new(InMemoryTokenBlacklist::new()),
            BlacklistBackend::Postgres => Arc::new(PgTokenBlacklist::new(pool.clone())),
        };

        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            links: Arc::new(PgLinkRepository::new(pool.clone())),
            clicks: Arc::new(PgClickRepository::new(pool)),
            blacklist,
        }
    }
}

/// Settings the services and handlers need from [`Config`].
#[derive(Debug, Clone)]
pub struct StateSettings {
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub bcrypt_cost: u32,
    pub base_url: Option<String>,
    pub behind_proxy: bool,
}

impl From<&Config> for StateSettings {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_ttl: chrono::Duration::hours(config.jwt_ttl_hours),
            bcrypt_cost: config.bcrypt_cost,
            base_url: config.base_url.clone(),
            behind_proxy: config.behind_proxy,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub link_service: Arc<LinkService>,
    pub redirect_service: Arc<RedirectService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub export_service: Arc<ExportService>,
    pub user_service: Arc<UserService>,
    /// Present when running on PostgreSQL; probed by `/health`.
    pub db: Option<Arc<PgPool>>,
    pub base_url: Option<String>,
    pub behind_proxy: bool,
}

impl AppState {
    pub fn new(repos: Repositories, settings: StateSettings) -> Self {
        let auth_service = Arc::new(AuthService::new(
            repos.users.clone(),
            repos.blacklist,
            &settings.jwt_secret,
            settings.token_ttl,
            settings.bcrypt_cost,
        ));

        let user_service = Arc::new(UserService::new(
            repos.users,
            repos.links.clone(),
            repos.clicks.clone(),
            auth_service.clone(),
        ));

        Self {
            auth_service,
            link_service: Arc::new(LinkService::new(repos.links.clone(), repos.clicks.clone())),
            redirect_service: Arc::new(RedirectService::new(
                repos.links.clone(),
                repos.clicks.clone(),
            )),
            analytics_service: Arc::new(AnalyticsService::new(
                repos.links.clone(),
                repos.clicks.clone(),
            )),
            export_service: Arc::new(ExportService::new(repos.links, repos.clicks)),
            user_service,
            db: None,
            base_url: settings.base_url,
            behind_proxy: settings.behind_proxy,
        }
    }

    /// Attaches the pool used by the health check.
    pub fn with_database(mut self, pool: Arc<PgPool>) -> Self {
        self.db = Some(pool);
        self
    }

    /// Public URL of a short code: `{BASE_URL}/s/{code}`, or relative when no
    /// base URL is configured.
    pub fn short_url(&self, code: &str) -> String {
        match self.base_url.as_deref() {
            Some(base) => format!("{}/s/{code}", base.trim_end_matches('/')),
            None => format!("/s/{code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: Option<&str>) -> StateSettings {
        StateSettings {
            jwt_secret: "state-test-secret-key".to_string(),
            token_ttl: chrono::Duration::hours(1),
            bcrypt_cost: 4,
            base_url: base_url.map(str::to_string),
            behind_proxy: false,
        }
    }

    #[test]
    fn test_short_url_relative_without_base() {
        let state = AppState::new(Repositories::in_memory(), settings(None));
        assert_eq!(state.short_url("abc123"), "/s/abc123");
        assert!(state.db.is_none());
    }

    #[test]
    fn test_short_url_with_base() {
        let state = AppState::new(Repositories::in_memory(), settings(Some("https://sho.rt/")));
        assert_eq!(state.short_url("abc123"), "https://sho.rt/s/abc123");
    }
}
