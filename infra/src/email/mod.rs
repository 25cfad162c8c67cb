//! Email Delivery Module
//!
//! Implementations of the verification email sender:
//!
//! - **SMTP**: production delivery via `lettre`
//! - **Mock**: console output for development and tests
//! - **Templates**: built-in or file-based HTML bodies

use std::sync::Arc;

use pms_core::services::otp::EmailSender;
use pms_shared::{EmailConfig, EmailProvider, Environment};

use crate::InfrastructureError;

pub mod mock_email;
pub mod smtp;
pub mod templates;

pub use mock_email::MockEmailSender;
pub use smtp::SmtpEmailSender;
pub use templates::{RenderedEmail, TemplateRenderer, FORGOT_PASSWORD_TEMPLATE, USER_ACTIVATION_TEMPLATE};

#[cfg(test)]
mod tests;

/// Escapes HTML special characters so template data cannot inject markup.
///
/// ```
/// use pms_infra::email::html_escape;
/// assert_eq!(html_escape("<b>"), "&lt;b&gt;");
/// ```
pub fn html_escape(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#x27;"),
            _ => output.push(c),
        }
    }
    output
}

/// Create an email sender based on configuration
///
/// In development an SMTP sender that cannot be configured falls back to the
/// console mock so the service still starts. Anywhere else the failure is
/// returned, and an explicitly configured mock never prints codes.
pub fn create_email_sender(
    config: &EmailConfig,
    environment: Environment,
) -> Result<Arc<dyn EmailSender>, InfrastructureError> {
    match config.provider {
        EmailProvider::Mock => {
            let console_output = environment.is_development();
            Ok(Arc::new(MockEmailSender::with_options(console_output, false)))
        }
        EmailProvider::Smtp => match SmtpEmailSender::new(config) {
            Ok(sender) => Ok(Arc::new(sender)),
            Err(e) if environment.is_development() => {
                tracing::error!("Failed to initialize SMTP email sender: {}", e);
                tracing::warn!("Falling back to mock email sender");
                Ok(Arc::new(MockEmailSender::new()))
            }
            Err(e) => {
                tracing::error!(environment = %environment, "Failed to initialize SMTP email sender: {}", e);
                Err(e)
            }
        },
    }
}
