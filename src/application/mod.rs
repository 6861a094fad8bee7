//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services hold repository trait objects and
//! provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Registration, login, token validation and revocation
//! - [`services::link_service::LinkService`] - Short link creation, listing, update and deletion
//! - [`services::redirect_service::RedirectService`] - Code resolution with click recording
//! - [`services::analytics_service::AnalyticsService`] - Paged click analytics
//! - [`services::export_service::ExportService`] - Streaming CSV export
//! - [`services::user_service::UserService`] - Profile update and account deletion

pub mod services;
