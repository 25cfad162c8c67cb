//! OTP guard service implementation

use std::sync::Arc;

use pms_shared::email::{is_valid_email, mask_email};
use pms_shared::{IssueOrdering, OtpConfig};

use crate::domain::entities::otp_code::OtpCode;
use crate::domain::value_objects::otp_keys::{OtpKeys, COOLDOWN_MARKER, LOCK_MARKER};
use crate::domain::value_objects::otp_status::OtpStatus;
use crate::errors::{DomainError, DomainResult, OtpError};

use super::traits::{EmailSender, KeyValueStore};
use super::types::{VerificationEmail, VerificationEmailData};

/// Guard controlling issuance, verification and rate limiting of email OTPs
///
/// Issuance callers run [`check_restrictions`](Self::check_restrictions),
/// then [`track_request`](Self::track_request), then [`issue`](Self::issue),
/// stopping at the first failure; [`request_code`](Self::request_code) does
/// exactly that.
///
/// Concurrent requests for the same email are not coordinated. Two
/// simultaneous `verify` calls may both read the same attempt count before
/// either writes it back, so attempts can be under-counted.
pub struct OtpGuard<S: KeyValueStore + ?Sized, E: EmailSender + ?Sized> {
    /// Store holding all per-email OTP state
    store: Arc<S>,
    /// Sender used to deliver codes
    email_sender: Arc<E>,
    /// Lifetimes and thresholds
    config: OtpConfig,
}

impl<S: KeyValueStore + ?Sized, E: EmailSender + ?Sized> OtpGuard<S, E> {
    /// Create a new guard
    ///
    /// # Arguments
    ///
    /// * `store` - Key-value store implementation
    /// * `email_sender` - Email sender implementation
    /// * `config` - Lifetimes and thresholds
    pub fn new(store: Arc<S>, email_sender: Arc<E>, config: OtpConfig) -> Self {
        Self {
            store,
            email_sender,
            config,
        }
    }

    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    /// Reject issuance while the email is locked, spam-locked or cooling down
    ///
    /// Checked in that order; read-only.
    pub async fn check_restrictions(&self, email: &str) -> DomainResult<()> {
        Self::require_email(email)?;
        let keys = OtpKeys::for_email(email);

        if self.store.get(&keys.lock).await?.is_some() {
            tracing::warn!(
                email = %mask_email(email),
                event = "otp_request_locked",
                "OTP request rejected: verification locked"
            );
            return Err(OtpError::AccountLocked {
                lock_seconds: self.config.lock_duration_seconds,
                newly_locked: false,
            }
            .into());
        }

        if self.store.get(&keys.spam_lock).await?.is_some() {
            tracing::warn!(
                email = %mask_email(email),
                event = "otp_request_spam_locked",
                "OTP request rejected: too many requests"
            );
            return Err(OtpError::TooManyRequests {
                wait_seconds: self.config.spam_lock_duration_seconds,
            }
            .into());
        }

        if self.store.get(&keys.cooldown).await?.is_some() {
            tracing::debug!(
                email = %mask_email(email),
                event = "otp_request_cooldown",
                "OTP request rejected: cooldown active"
            );
            return Err(OtpError::CooldownActive {
                wait_seconds: self.config.cooldown_seconds,
            }
            .into());
        }

        Ok(())
    }

    /// Count an issuance request, spam-locking the email once the window is full
    ///
    /// The window lifetime is re-applied on every counted request, so the
    /// window restarts from the most recent request rather than the first.
    /// The counter is left untouched when the lock is set.
    pub async fn track_request(&self, email: &str) -> DomainResult<()> {
        Self::require_email(email)?;
        let keys = OtpKeys::for_email(email);
        let requests = self.read_counter(&keys.request_count).await?;

        if requests >= self.config.max_requests_per_window {
            self.store
                .set(
                    &keys.spam_lock,
                    LOCK_MARKER,
                    Some(self.config.spam_lock_duration_seconds),
                )
                .await?;

            tracing::warn!(
                email = %mask_email(email),
                requests = requests,
                event = "otp_spam_locked",
                "Too many OTP requests, issuance locked"
            );
            return Err(OtpError::TooManyRequests {
                wait_seconds: self.config.spam_lock_duration_seconds,
            }
            .into());
        }

        self.store
            .set(
                &keys.request_count,
                &(requests + 1).to_string(),
                Some(self.config.request_window_seconds),
            )
            .await?;

        Ok(())
    }

    /// Generate a code, email it, and store it with a fresh cooldown
    ///
    /// A new code replaces any active one and resets the attempt counter.
    /// With [`IssueOrdering::SendThenPersist`] a failed send fails the call
    /// and writes nothing; with [`IssueOrdering::PersistThenSend`] a failed
    /// send is logged and the stored code stays valid.
    pub async fn issue(&self, name: &str, email: &str, template_id: &str) -> DomainResult<()> {
        Self::require_email(email)?;
        let keys = OtpKeys::for_email(email);
        let code = OtpCode::generate();

        let message = VerificationEmail {
            to: email.to_string(),
            subject: self.config.email_subject.clone(),
            template_id: template_id.to_string(),
            data: VerificationEmailData {
                name: name.to_string(),
                otp: code.as_str().to_string(),
            },
        };

        match self.config.issue_ordering {
            IssueOrdering::SendThenPersist => {
                self.send(&message).await?;
                self.persist(&keys, &code).await?;
            }
            IssueOrdering::PersistThenSend => {
                self.persist(&keys, &code).await?;
                if let Err(e) = self.send(&message).await {
                    tracing::warn!(
                        email = %mask_email(email),
                        error = %e,
                        event = "otp_send_failed_code_kept",
                        "Verification email failed; stored code remains valid"
                    );
                }
            }
        }

        tracing::info!(
            email = %mask_email(email),
            template = template_id,
            event = "otp_issued",
            "Issued verification code"
        );

        Ok(())
    }

    /// Check a submitted code against the active one
    ///
    /// A locked email is rejected before the code is looked at. A wrong guess
    /// increments the attempt counter; the last allowed wrong guess locks
    /// verification and burns the code. Success consumes the code.
    pub async fn verify(&self, email: &str, submitted_code: &str) -> DomainResult<()> {
        Self::require_email(email)?;
        let keys = OtpKeys::for_email(email);

        if self.store.get(&keys.lock).await?.is_some() {
            return Err(OtpError::AccountLocked {
                lock_seconds: self.config.lock_duration_seconds,
                newly_locked: false,
            }
            .into());
        }

        let stored = match self.store.get(&keys.code).await? {
            Some(code) => OtpCode::from_stored(code),
            None => {
                tracing::debug!(
                    email = %mask_email(email),
                    event = "otp_not_found",
                    "No active verification code (never issued or expired)"
                );
                return Err(OtpError::InvalidOrExpiredOtp.into());
            }
        };

        let attempts = self.read_counter(&keys.attempts).await?;

        if !stored.matches(submitted_code) {
            if attempts + 1 >= self.config.max_attempts {
                self.store
                    .set(&keys.lock, LOCK_MARKER, Some(self.config.lock_duration_seconds))
                    .await?;
                self.store.delete(&keys.code_and_attempts()).await?;

                tracing::warn!(
                    email = %mask_email(email),
                    attempts = attempts + 1,
                    event = "otp_locked",
                    "Maximum verification attempts exceeded, verification locked"
                );
                return Err(OtpError::AccountLocked {
                    lock_seconds: self.config.lock_duration_seconds,
                    newly_locked: true,
                }
                .into());
            }

            // No lifetime of its own: cleared on success, lockout or reissue
            self.store
                .set(&keys.attempts, &(attempts + 1).to_string(), None)
                .await?;

            let remaining_attempts = self.config.max_attempts - 1 - attempts;
            tracing::warn!(
                email = %mask_email(email),
                remaining_attempts = remaining_attempts,
                event = "otp_verification_failed",
                "Incorrect verification code"
            );
            return Err(OtpError::IncorrectOtp { remaining_attempts }.into());
        }

        self.store.delete(&keys.code_and_attempts()).await?;

        tracing::info!(
            email = %mask_email(email),
            event = "otp_verified",
            "Verification code successfully verified"
        );

        Ok(())
    }

    /// Invalidate the active code only; attempts, cooldown and locks are kept
    pub async fn delete_otp(&self, email: &str) -> DomainResult<()> {
        Self::require_email(email)?;
        let keys = OtpKeys::for_email(email);
        let removed = self.store.delete(&[keys.code]).await?;

        tracing::info!(
            email = %mask_email(email),
            removed = removed > 0,
            event = "otp_deleted",
            "Invalidated verification code"
        );

        Ok(())
    }

    /// Full issuance flow: restrictions, request tracking, then issuance
    ///
    /// Rejects malformed addresses before touching the store.
    pub async fn request_code(&self, name: &str, email: &str, template_id: &str) -> DomainResult<()> {
        if !is_valid_email(email) {
            return Err(DomainError::Validation {
                message: format!("Invalid email format: {}", mask_email(email)),
            });
        }

        self.check_restrictions(email).await?;
        self.track_request(email).await?;
        self.issue(name, email, template_id).await
    }

    /// Read every OTP key for an email without changing anything
    pub async fn status(&self, email: &str) -> DomainResult<OtpStatus> {
        Self::require_email(email)?;
        let keys = OtpKeys::for_email(email);

        let code_active = self.store.get(&keys.code).await?.is_some();
        let code_ttl_seconds = if code_active {
            self.store.ttl(&keys.code).await?
        } else {
            None
        };

        Ok(OtpStatus {
            email: email.to_string(),
            code_active,
            code_ttl_seconds,
            attempts: self.read_counter(&keys.attempts).await?,
            cooldown_remaining_seconds: self.store.ttl(&keys.cooldown).await?,
            lock_remaining_seconds: self.store.ttl(&keys.lock).await?,
            request_count: self.read_counter(&keys.request_count).await?,
            spam_lock_remaining_seconds: self.store.ttl(&keys.spam_lock).await?,
        })
    }

    async fn send(&self, message: &VerificationEmail) -> DomainResult<()> {
        self.email_sender
            .send_verification_email(message)
            .await
            .map_err(|e| {
                tracing::error!(
                    email = %mask_email(&message.to),
                    error = %e,
                    event = "otp_send_failed",
                    "Failed to send verification email"
                );
                DomainError::from(e)
            })
    }

    async fn persist(&self, keys: &OtpKeys, code: &OtpCode) -> DomainResult<()> {
        self.store
            .set(&keys.code, code.as_str(), Some(self.config.code_ttl_seconds))
            .await?;
        self.store
            .set(&keys.cooldown, COOLDOWN_MARKER, Some(self.config.cooldown_seconds))
            .await?;
        self.store.delete(&[keys.attempts.clone()]).await?;
        Ok(())
    }

    /// Read a counter key; absent or unparsable values count as zero
    async fn read_counter(&self, key: &str) -> DomainResult<u32> {
        match self.store.get(key).await? {
            None => Ok(0),
            Some(raw) => match raw.parse::<u32>() {
                Ok(count) => Ok(count),
                Err(_) => {
                    tracing::warn!(key = key, value = %raw, "Unparsable OTP counter, treating as 0");
                    Ok(0)
                }
            },
        }
    }

    fn require_email(email: &str) -> DomainResult<()> {
        if email.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Email is required".to_string(),
            });
        }
        Ok(())
    }
}
