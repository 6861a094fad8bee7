//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`User`] - An account that owns links
//! - [`Link`] - A shortened URL mapping owned by a user
//! - [`Click`] - A single recorded redirect of a link
//!
//! Entities follow the "New Type" pattern with separate structs for creation
//! (`NewUser`, `NewLink`, `NewClick`) and partial updates (`UserPatch`).

pub mod click;
pub mod link;
pub mod user;

pub use click::{Click, ClickCursor, NewClick};
pub use link::{Link, NewLink};
pub use user::{NewUser, User, UserPatch};
