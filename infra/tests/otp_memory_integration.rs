//! Integration tests for the OTP guard over the in-memory store
//!
//! Tokio time is paused, so lifetimes are exercised with `tokio::time::advance`.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use pms_core::errors::{DomainError, OtpError};
    use pms_core::services::otp::OtpGuard;
    use pms_infra::cache::MemoryStore;
    use pms_infra::email::{MockEmailSender, USER_ACTIVATION_TEMPLATE};
    use pms_shared::OtpConfig;

    const EMAIL: &str = "member@example.com";

    fn guard() -> (OtpGuard<MemoryStore, MockEmailSender>, Arc<MemoryStore>, Arc<MockEmailSender>) {
        let store = Arc::new(MemoryStore::new());
        let sender = Arc::new(MockEmailSender::with_options(false, false));
        let guard = OtpGuard::new(store.clone(), sender.clone(), OtpConfig::default());
        (guard, store, sender)
    }

    fn otp_error(result: Result<(), DomainError>) -> OtpError {
        match result {
            Err(DomainError::Otp(e)) => e,
            other => panic!("Expected OTP error, got {:?}", other),
        }
    }

    async fn advance(seconds: u64) {
        tokio::time::advance(Duration::from_secs(seconds)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_and_verify() {
        let (guard, _store, sender) = guard();

        guard.request_code("Member", EMAIL, USER_ACTIVATION_TEMPLATE).await.unwrap();
        let code = sender.last_code(EMAIL).unwrap();

        guard.verify(EMAIL, &code).await.unwrap();
        assert_eq!(otp_error(guard.verify(EMAIL, &code).await), OtpError::InvalidOrExpiredOtp);
    }

    #[tokio::test(start_paused = true)]
    async fn test_code_expires_after_five_minutes() {
        let (guard, _store, sender) = guard();

        guard.issue("Member", EMAIL, USER_ACTIVATION_TEMPLATE).await.unwrap();
        let code = sender.last_code(EMAIL).unwrap();

        advance(299).await;
        assert!(guard.status(EMAIL).await.unwrap().code_active);

        advance(1).await;
        assert_eq!(otp_error(guard.verify(EMAIL, &code).await), OtpError::InvalidOrExpiredOtp);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_then_spam_lock() {
        let (guard, _store, sender) = guard();

        guard.request_code("Member", EMAIL, USER_ACTIVATION_TEMPLATE).await.unwrap();
        assert_eq!(
            otp_error(guard.request_code("Member", EMAIL, USER_ACTIVATION_TEMPLATE).await),
            OtpError::CooldownActive { wait_seconds: 60 }
        );

        advance(60).await;
        guard.request_code("Member", EMAIL, USER_ACTIVATION_TEMPLATE).await.unwrap();

        advance(60).await;
        assert_eq!(
            otp_error(guard.request_code("Member", EMAIL, USER_ACTIVATION_TEMPLATE).await),
            OtpError::TooManyRequests { wait_seconds: 3600 }
        );
        assert_eq!(sender.message_count(), 2);

        // Spam lock holds for the full hour, then issuance resumes
        advance(3599).await;
        assert_eq!(
            otp_error(guard.check_restrictions(EMAIL).await),
            OtpError::TooManyRequests { wait_seconds: 3600 }
        );
        advance(1).await;
        guard.check_restrictions(EMAIL).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_lockout_and_recovery() {
        let (guard, _store, sender) = guard();

        guard.issue("Member", EMAIL, USER_ACTIVATION_TEMPLATE).await.unwrap();
        let code = sender.last_code(EMAIL).unwrap();
        let wrong = if code == "999999" { "100000" } else { "999999" };

        assert_eq!(
            otp_error(guard.verify(EMAIL, wrong).await),
            OtpError::IncorrectOtp { remaining_attempts: 2 }
        );
        assert_eq!(
            otp_error(guard.verify(EMAIL, wrong).await),
            OtpError::IncorrectOtp { remaining_attempts: 1 }
        );
        assert_eq!(
            otp_error(guard.verify(EMAIL, wrong).await),
            OtpError::AccountLocked { lock_seconds: 1800, newly_locked: true }
        );
        assert_eq!(
            otp_error(guard.verify(EMAIL, &code).await),
            OtpError::AccountLocked { lock_seconds: 1800, newly_locked: false }
        );

        advance(1800).await;
        guard.request_code("Member", EMAIL, USER_ACTIVATION_TEMPLATE).await.unwrap();
        let fresh = sender.last_code(EMAIL).unwrap();
        guard.verify(EMAIL, &fresh).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_state_is_purged() {
        let (guard, store, _sender) = guard();

        guard.request_code("Member", EMAIL, USER_ACTIVATION_TEMPLATE).await.unwrap();
        assert_eq!(store.len().await, 3);

        advance(3600).await;
        assert_eq!(store.purge_expired().await, 3);
        assert!(store.is_empty().await);
    }
}
