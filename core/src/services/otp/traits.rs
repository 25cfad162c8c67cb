//! Traits for key-value store and email integration

use async_trait::async_trait;

use crate::errors::{EmailError, StoreError};

use super::types::VerificationEmail;

/// Key-value store with per-key expiry
///
/// Every method is a single atomic operation at the store level. An absent
/// key and an expired key are indistinguishable.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key is absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Write a value, replacing any previous value and lifetime.
    /// `None` stores the key without expiry.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<(), StoreError>;
    /// Delete all given keys in one atomic step, returning how many existed
    async fn delete(&self, keys: &[String]) -> Result<u64, StoreError>;
    /// Remaining lifetime in seconds; `None` when absent or stored without expiry
    async fn ttl(&self, key: &str) -> Result<Option<u64>, StoreError>;
}

/// Trait for email delivery integration
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Render and send a verification email; fails on any transport error
    async fn send_verification_email(&self, email: &VerificationEmail) -> Result<(), EmailError>;
}
