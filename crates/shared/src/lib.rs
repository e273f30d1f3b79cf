//! Shared types, errors, and configuration for Kudos.
//!
//! This crate provides common types used across all other crates:
//! - Point value helpers with fixed decimal precision
//! - Validated email address type
//! - Application-wide error types
//! - Configuration management
//! - SMTP notification delivery

pub mod config;
pub mod email;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use email::EmailService;
pub use error::{AppError, AppResult};
pub use types::email::EmailAddress;
