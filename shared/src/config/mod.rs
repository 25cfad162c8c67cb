//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `cache` - Key-value store backend and Redis configuration
//! - `email` - Outbound email (SMTP) configuration
//! - `environment` - Environment detection and logging configuration
//! - `otp` - One-time code lifetimes, cooldowns and lockout thresholds

pub mod cache;
pub mod email;
pub mod environment;
pub mod otp;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::{CacheConfig, CacheType};
pub use email::{EmailConfig, EmailProvider};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::{IssueOrdering, OtpConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Key-value store configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// OTP guard configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Email delivery configuration
    #[serde(default)]
    pub email: EmailConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            cache: CacheConfig::default(),
            otp: OtpConfig::default(),
            email: EmailConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    ///
    /// Uses the in-memory store and the mock email sender so nothing
    /// external is needed to run locally.
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            cache: CacheConfig {
                cache_type: CacheType::Memory,
                ..CacheConfig::default()
            },
            otp: OtpConfig::default(),
            email: EmailConfig::mock(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            cache: CacheConfig::new("redis://redis:6379").with_prefix("pms"),
            otp: OtpConfig::default(),
            email: EmailConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from environment
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let mut config = match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::production();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        };

        config.cache = config.cache.merge_env();
        config.email = config.email.merge_env();
        config.otp = config.otp.merge_env();
        config
    }
}
