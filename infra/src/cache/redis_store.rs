//! Redis-backed key-value store for OTP state
//!
//! Keys are stored as given by the guard (`otp:{email}`, `otp_lock:{email}`, ...),
//! behind the optional deployment-wide prefix from [`CacheConfig::key_prefix`].

use async_trait::async_trait;

use pms_core::errors::StoreError;
use pms_core::services::otp::KeyValueStore;
use pms_shared::CacheConfig;

use crate::cache::RedisClient;
use crate::InfrastructureError;

/// [`KeyValueStore`] over a shared [`RedisClient`]
#[derive(Clone)]
pub struct RedisOtpStore {
    client: RedisClient,
}

impl RedisOtpStore {
    /// Wrap an existing client
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Connect to Redis and wrap the resulting client
    pub async fn connect(config: CacheConfig) -> Result<Self, InfrastructureError> {
        Ok(Self::new(RedisClient::new(config).await?))
    }

    /// Underlying client, for health checks
    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    fn key(&self, key: &str) -> String {
        self.client.config().make_key(key)
    }
}

#[async_trait]
impl KeyValueStore for RedisOtpStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.client.get(&self.key(key)).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<(), StoreError> {
        let key = self.key(key);
        match ttl_seconds {
            Some(ttl) => self.client.set_with_expiry(&key, value, ttl).await?,
            None => self.client.set(&key, value).await?,
        }
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<u64, StoreError> {
        let keys: Vec<String> = keys.iter().map(|k| self.key(k)).collect();
        Ok(self.client.delete_many(&keys).await?)
    }

    async fn ttl(&self, key: &str) -> Result<Option<u64>, StoreError> {
        Ok(self.client.ttl(&self.key(key)).await?)
    }
}
