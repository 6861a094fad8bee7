//! Cryptographic primitives used by the authentication service.
//!
//! - [`jwt`] - HS256 session tokens (`jsonwebtoken`)
//! - [`password`] - bcrypt password hashing, run off the async executor

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtKeys};
