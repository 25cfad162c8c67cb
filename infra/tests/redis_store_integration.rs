//! Integration tests for the Redis-backed OTP store
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p pms_infra --test redis_store_integration -- --ignored

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pms_core::errors::{DomainError, OtpError};
    use pms_core::services::otp::{KeyValueStore, OtpGuard};
    use pms_infra::cache::{CacheConfig, RedisOtpStore};
    use pms_infra::email::{MockEmailSender, FORGOT_PASSWORD_TEMPLATE};
    use pms_shared::OtpConfig;

    fn config() -> CacheConfig {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        // Unique prefix per run keeps tests independent of leftovers
        CacheConfig::new(url).with_prefix(format!("pms_test:{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    #[ignore] // Requires Redis server
    async fn test_store_operations() {
        let store = RedisOtpStore::connect(config()).await.unwrap();
        assert!(store.client().health_check().await.unwrap());

        store.set("otp:a@x.com", "123456", Some(300)).await.unwrap();
        store.set("otp_attempts:a@x.com", "1", None).await.unwrap();

        assert_eq!(store.get("otp:a@x.com").await.unwrap(), Some("123456".to_string()));
        let ttl = store.ttl("otp:a@x.com").await.unwrap().unwrap();
        assert!(ttl > 290 && ttl <= 300);
        assert_eq!(store.ttl("otp_attempts:a@x.com").await.unwrap(), None);

        let removed = store
            .delete(&["otp:a@x.com".to_string(), "otp_attempts:a@x.com".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.get("otp:a@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore] // Requires Redis server
    async fn test_keys_carry_prefix() {
        let config = config();
        let prefix = config.key_prefix.clone().unwrap();
        let store = RedisOtpStore::connect(config).await.unwrap();

        store.set("otp_lock:a@x.com", "locked", Some(60)).await.unwrap();

        let raw = store.client().get(&format!("{}:otp_lock:a@x.com", prefix)).await.unwrap();
        assert_eq!(raw, Some("locked".to_string()));

        store.delete(&["otp_lock:a@x.com".to_string()]).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires Redis server
    async fn test_guard_over_redis() {
        let store = Arc::new(RedisOtpStore::connect(config()).await.unwrap());
        let sender = Arc::new(MockEmailSender::with_options(false, false));
        let guard = OtpGuard::new(store, sender.clone(), OtpConfig::default());
        let email = "redis-user@example.com";

        guard.request_code("Redis User", email, FORGOT_PASSWORD_TEMPLATE).await.unwrap();
        let code = sender.last_code(email).unwrap();

        match guard.request_code("Redis User", email, FORGOT_PASSWORD_TEMPLATE).await {
            Err(DomainError::Otp(OtpError::CooldownActive { .. })) => {}
            other => panic!("Expected cooldown, got {:?}", other),
        }

        guard.verify(email, &code).await.unwrap();
        let status = guard.status(email).await.unwrap();
        assert!(!status.code_active);
        assert_eq!(status.request_count, 1);
    }
}
