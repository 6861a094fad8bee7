//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access so services never see SQL. They are
//! implemented in the infrastructure layer.
//!
//! # Architecture
//!
//! - Implementations live in `crate::infrastructure::persistence` (PostgreSQL)
//!   and `crate::infrastructure::memory` (in-process, used by tests and the
//!   default token blacklist)
//! - Mock implementations are auto-generated via `mockall` for unit tests
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Account storage
//! - [`LinkRepository`] - Short link CRUD, search and click counter
//! - [`ClickRepository`] - Append-only click analytics
//! - [`TokenBlacklist`] - Revoked session tokens

pub mod click_repository;
pub mod link_repository;
pub mod token_blacklist;
pub mod user_repository;

pub use click_repository::ClickRepository;
pub use link_repository::{LinkQuery, LinkRepository};
pub use token_blacklist::TokenBlacklist;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use token_blacklist::MockTokenBlacklist;
#[cfg(test)]
pub use user_repository::MockUserRepository;
