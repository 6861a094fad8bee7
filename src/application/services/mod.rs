//! Business logic services for the application layer.

pub mod analytics_service;
pub mod auth_service;
pub mod export_service;
pub mod link_service;
pub mod redirect_service;
pub mod user_service;

pub use analytics_service::{AnalyticsPage, AnalyticsService};
pub use auth_service::AuthService;
pub use export_service::{CsvExport, ExportService};
pub use link_service::LinkService;
pub use redirect_service::{ClientInfo, RedirectService};
pub use user_service::{DeletionSummary, UserService};
