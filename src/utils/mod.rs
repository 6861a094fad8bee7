//! Utility functions shared across the application.

pub mod client_ip;
pub mod code_generator;
