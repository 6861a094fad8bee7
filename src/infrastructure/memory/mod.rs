//! In-process repository implementations.
//!
//! - [`InMemoryStore`] - users, links and clicks in sharded maps (tests, demos)
//! - [`InMemoryTokenBlacklist`] - default token revocation set

pub mod store;
pub mod token_blacklist;

pub use store::InMemoryStore;
pub use token_blacklist::InMemoryTokenBlacklist;
