//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`memory`] - In-process repositories and token blacklist
//! - [`security`] - JWT issuing and bcrypt hashing

pub mod memory;
pub mod persistence;
pub mod security;
