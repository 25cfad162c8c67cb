//! Cache module for OTP state storage
//!
//! This module provides the key-value store backends behind the OTP guard:
//! a Redis client with retry logic, a Redis-backed store, and an in-memory
//! store for development and tests.

pub mod memory_store;
pub mod redis_client;
pub mod redis_store;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use pms_core::services::otp::KeyValueStore;

pub use memory_store::MemoryStore;
pub use redis_client::RedisClient;
pub use redis_store::RedisOtpStore;

// Re-export commonly used types
pub use pms_shared::{CacheConfig, CacheType};

use crate::InfrastructureError;

/// Create the store backend selected by `config.cache_type`
///
/// A Redis backend connects eagerly so misconfiguration surfaces at startup.
pub async fn create_store(config: &CacheConfig) -> Result<Arc<dyn KeyValueStore>, InfrastructureError> {
    match config.cache_type {
        CacheType::Redis => {
            let store = RedisOtpStore::connect(config.clone()).await?;
            Ok(Arc::new(store))
        }
        CacheType::Memory => {
            tracing::info!("Using in-memory OTP store; state is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
