//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborators the OTP guard depends on:
//!
//! - **Cache**: Redis-backed and in-memory [`KeyValueStore`] implementations
//! - **Email**: SMTP delivery via `lettre`, template rendering and a mock sender
//! - **Telemetry**: `tracing-subscriber` initialization
//!
//! [`build_otp_guard`] wires the configured backends into a ready-to-use guard.

use pms_core::errors::{EmailError, StoreError};
use pms_core::services::otp::{EmailSender, KeyValueStore, OtpGuard};
use pms_shared::{AppConfig, Environment};

/// Cache module - Redis client and key-value store backends
pub mod cache;

/// Email module - SMTP delivery, templates and mock sender
pub mod email;

/// Telemetry module - tracing subscriber setup
pub mod telemetry;

/// OTP guard over type-erased collaborators, as built from configuration
pub type DynOtpGuard = OtpGuard<dyn KeyValueStore, dyn EmailSender>;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// SMTP transport error
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Email building or delivery error
    #[error("Email error: {0}")]
    Email(String),

    /// Template lookup or rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for StoreError {
    fn from(err: InfrastructureError) -> Self {
        StoreError::new(err.to_string())
    }
}

impl From<InfrastructureError> for EmailError {
    fn from(err: InfrastructureError) -> Self {
        EmailError::new(err.to_string())
    }
}

/// Load application configuration
///
/// Sources, lowest precedence first:
/// - built-in defaults for the detected environment
/// - `config.{environment}.toml` in the working directory, if present
/// - `.env.{environment}` and `.env` files (via dotenvy)
/// - `PMS__*` environment variables (`PMS__OTP__MAX_ATTEMPTS=5`)
/// - the flat variables understood by each section (`REDIS_URL`, `SMTP_HOST`, `OTP_*`, ...)
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();
    dotenvy::dotenv().ok();

    let base = AppConfig::from_env();
    let defaults = config::Config::try_from(&base)
        .map_err(|e| InfrastructureError::Config(format!("Invalid default configuration: {}", e)))?;

    let layered = config::Config::builder()
        .add_source(defaults)
        .add_source(config::File::with_name(environment.config_file()).required(false))
        .add_source(
            config::Environment::with_prefix("PMS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| InfrastructureError::Config(e.to_string()))?;

    let mut app_config: AppConfig = layered
        .try_deserialize()
        .map_err(|e| InfrastructureError::Config(e.to_string()))?;

    app_config.environment = environment;
    app_config.cache = app_config.cache.merge_env();
    app_config.email = app_config.email.merge_env();
    app_config.otp = app_config.otp.merge_env();

    tracing::debug!(
        environment = %environment,
        cache_type = ?app_config.cache.cache_type,
        email_provider = ?app_config.email.provider,
        "Configuration loaded"
    );

    Ok(app_config)
}

/// Build an OTP guard from configuration
///
/// Connects the configured store (failing if Redis is unreachable) and
/// selects the email sender. Outside development an SMTP sender that cannot
/// be set up fails the build.
pub async fn build_otp_guard(config: &AppConfig) -> Result<DynOtpGuard, InfrastructureError> {
    let store = cache::create_store(&config.cache).await?;
    let email_sender = email::create_email_sender(&config.email, config.environment)?;

    tracing::info!(
        cache_type = ?config.cache.cache_type,
        email_provider = ?config.email.provider,
        "OTP guard initialized"
    );

    Ok(OtpGuard::new(store, email_sender, config.otp.clone()))
}
