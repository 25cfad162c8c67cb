//! End-to-end flows through the OTP guard with in-process collaborators

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use pms_core::errors::{DomainError, EmailError, OtpError, StoreError};
    use pms_core::services::otp::{EmailSender, KeyValueStore, OtpGuard, VerificationEmail};
    use pms_shared::OtpConfig;

    // Store without expiry; these flows finish well inside every lifetime
    struct InlineStore {
        entries: RwLock<HashMap<String, (String, Option<u64>)>>,
    }

    impl InlineStore {
        fn new() -> Self {
            Self {
                entries: RwLock::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl KeyValueStore for InlineStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.entries.read().await.get(key).map(|(v, _)| v.clone()))
        }

        async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> Result<(), StoreError> {
            self.entries
                .write()
                .await
                .insert(key.to_string(), (value.to_string(), ttl_seconds));
            Ok(())
        }

        async fn delete(&self, keys: &[String]) -> Result<u64, StoreError> {
            let mut entries = self.entries.write().await;
            Ok(keys.iter().filter(|k| entries.remove(*k).is_some()).count() as u64)
        }

        async fn ttl(&self, key: &str) -> Result<Option<u64>, StoreError> {
            Ok(self.entries.read().await.get(key).and_then(|(_, ttl)| *ttl))
        }
    }

    // Captures outgoing mail so the test can read the code back
    struct Inbox {
        messages: RwLock<Vec<VerificationEmail>>,
    }

    impl Inbox {
        fn new() -> Self {
            Self {
                messages: RwLock::new(Vec::new()),
            }
        }

        async fn latest_code(&self) -> String {
            let messages = self.messages.read().await;
            messages.last().map(|m| m.data.otp.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl EmailSender for Inbox {
        async fn send_verification_email(&self, email: &VerificationEmail) -> Result<(), EmailError> {
            self.messages.write().await.push(email.clone());
            Ok(())
        }
    }

    fn guard() -> (Arc<OtpGuard<InlineStore, Inbox>>, Arc<Inbox>) {
        let inbox = Arc::new(Inbox::new());
        let guard = OtpGuard::new(Arc::new(InlineStore::new()), inbox.clone(), OtpConfig::default());
        (Arc::new(guard), inbox)
    }

    #[tokio::test]
    async fn test_register_and_verify_flow() {
        let (guard, inbox) = guard();
        let email = "new.user@example.com";

        guard
            .request_code("New User", email, "user-activation-mail")
            .await
            .unwrap();
        let code = inbox.latest_code().await;
        assert_eq!(code.len(), 6);

        let status = guard.status(email).await.unwrap();
        assert!(status.code_active);
        assert_eq!(status.request_count, 1);

        guard.verify(email, &code).await.unwrap();

        let status = guard.status(email).await.unwrap();
        assert!(!status.code_active);
        assert_eq!(status.attempts, 0);
    }

    #[tokio::test]
    async fn test_guessing_locks_out_before_success() {
        let (guard, inbox) = guard();
        let email = "target@example.com";

        guard.issue("Target", email, "forgot-password-user-mail").await.unwrap();
        let code = inbox.latest_code().await;

        let wrong: Vec<String> = (100_000..)
            .map(|n: u32| n.to_string())
            .filter(|candidate| *candidate != code)
            .take(3)
            .collect();

        for guess in &wrong {
            assert!(guard.verify(email, guess).await.is_err());
        }

        match guard.verify(email, &code).await {
            Err(DomainError::Otp(OtpError::AccountLocked { .. })) => {}
            other => panic!("Expected lockout, got {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_wrong_guesses_never_succeed() {
        let (guard, inbox) = guard();
        let email = "race@example.com";

        guard.issue("Race", email, "user-activation-mail").await.unwrap();
        let code = inbox.latest_code().await;
        let wrong = if code == "999999" { "100000" } else { "999999" };

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let guard = guard.clone();
                tokio::spawn(async move { guard.verify(email, wrong).await })
            })
            .collect();

        for handle in handles {
            let result = handle.await.unwrap();
            match result {
                Err(DomainError::Otp(_)) => {}
                other => panic!("Wrong guess must fail with an OTP error, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_error_responses_are_bad_requests() {
        let (guard, _inbox) = guard();

        let error = guard.verify("nobody@example.com", "123456").await.unwrap_err();
        assert_eq!(error.status_code(), 400);
        assert!(error.is_operational());
        assert_eq!(error.to_string(), "Invalid OTP or Expired!");
    }
}
