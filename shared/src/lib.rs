//! Shared utilities and common types for the PMS auth services
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures
//! - Email address helpers (validation, masking)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment,
    CacheConfig, CacheType, EmailConfig, EmailProvider, IssueOrdering, LoggingConfig, LogFormat,
    OtpConfig,
};
pub use errors::{ErrorResponse, IntoErrorResponse, ApiResult, error_codes};
pub use utils::email;
