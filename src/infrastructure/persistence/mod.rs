//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` row structs. Schema lives in `migrations/`.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - User accounts
//! - [`PgLinkRepository`] - Link storage, search and click counter
//! - [`PgClickRepository`] - Click analytics
//! - [`PgTokenBlacklist`] - Revoked session tokens

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_token_blacklist;
pub mod pg_user_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_token_blacklist::PgTokenBlacklist;
pub use pg_user_repository::PgUserRepository;
