//! Tracing subscriber setup
//!
//! Installs a global `tracing-subscriber` fmt layer in the configured format.
//! `RUST_LOG`, when set, takes precedence over the configured level.

use pms_shared::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::InfrastructureError;

/// Build the level filter: `RUST_LOG` first, then the configured directive
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, InfrastructureError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| InfrastructureError::Config(format!("Invalid log level '{}': {}", config.level, e))),
    }
}

/// Initialize the global tracing subscriber
///
/// Fails if the level directive is invalid or a global subscriber is
/// already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = env_filter(config)?;

    let result = match config.format {
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_ansi(config.colored)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_ansi(config.colored)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()
        }
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_file(config.source_location)
                .with_line_number(config.source_location)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()
        }
    };

    result.map_err(|e| InfrastructureError::Config(format!("Failed to initialize tracing: {}", e)))?;

    tracing::debug!(level = %config.level, format = ?config.format, "Tracing initialized");
    Ok(())
}
