//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into service calls and formats
//! responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`extractors`] - Validated JSON bodies and visitor metadata
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication and tracing middleware
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
