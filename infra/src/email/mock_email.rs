//! Mock Email Sender Implementation
//!
//! A mock implementation of the email sender for development and testing.
//! This implementation logs messages instead of delivering them.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use pms_core::errors::EmailError;
use pms_core::services::otp::{EmailSender, VerificationEmail};
use pms_shared::email::mask_email;

/// Mock email sender for development and testing
///
/// This implementation:
/// - Prints messages to the console (optional)
/// - Records the last code sent to each recipient
/// - Tracks message count for testing
/// - Can simulate delivery failures
#[derive(Clone)]
pub struct MockEmailSender {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Last code sent, keyed by recipient
    last_codes: Arc<Mutex<HashMap<String, String>>>,
    /// Whether to simulate failures (for testing)
    simulate_failure: Arc<AtomicBool>,
    /// Whether to print messages to console
    console_output: bool,
}

impl MockEmailSender {
    /// Create a new mock sender that prints to the console
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    /// Create a mock sender with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            last_codes: Arc::new(Mutex::new(HashMap::new())),
            simulate_failure: Arc::new(AtomicBool::new(simulate_failure)),
            console_output,
        }
    }

    /// Get the total number of messages sent
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Last code sent to `email`, if any
    pub fn last_code(&self, email: &str) -> Option<String> {
        self.last_codes
            .lock()
            .ok()
            .and_then(|codes| codes.get(email).cloned())
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Reset the message counter and recorded codes
    pub fn reset(&self) {
        self.message_count.store(0, Ordering::SeqCst);
        if let Ok(mut codes) = self.last_codes.lock() {
            codes.clear();
        }
    }
}

impl Default for MockEmailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send_verification_email(&self, email: &VerificationEmail) -> Result<(), EmailError> {
        let masked = mask_email(&email.to);

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(to = %masked, "Mock email sender simulating failure");
            return Err(EmailError::new("Simulated email sending failure"));
        }

        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut codes) = self.last_codes.lock() {
            codes.insert(email.to.clone(), email.data.otp.clone());
        }

        if self.console_output {
            // Development console only; the code never goes to the structured log
            println!("\n{}", "=".repeat(60));
            println!("MOCK EMAIL SENDER - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", email.to);
            println!("Subject: {}", email.subject);
            println!("Template: {}", email.template_id);
            println!("Name: {}", email.data.name);
            println!("Code: {}", email.data.otp);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            provider = "mock",
            to = %masked,
            template = %email.template_id,
            message_number = count,
            "Verification email sent (mock)"
        );

        Ok(())
    }
}
