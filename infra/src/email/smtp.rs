//! SMTP email sender
//!
//! Renders the requested template and delivers it through an async `lettre`
//! transport running on tokio.

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use pms_core::errors::EmailError;
use pms_core::services::otp::{EmailSender, VerificationEmail};
use pms_shared::email::mask_email;
use pms_shared::EmailConfig;

use super::templates::TemplateRenderer;
use crate::InfrastructureError;

/// [`EmailSender`] delivering over SMTP
pub struct SmtpEmailSender {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    renderer: TemplateRenderer,
}

impl SmtpEmailSender {
    /// Build the transport from configuration
    ///
    /// Fails when no relay host or sender address can be determined, when
    /// only one of user/password is set, or when the relay cannot be
    /// configured for TLS. No connection is made until the first send.
    pub fn new(config: &EmailConfig) -> Result<Self, InfrastructureError> {
        let host = config
            .relay_host()
            .ok_or_else(|| InfrastructureError::Config("SMTP_HOST or SMTP_SERVICE must be set".to_string()))?;
        let sender = config
            .sender()
            .ok_or_else(|| InfrastructureError::Config("EMAIL_FROM or SMTP_USER must be set".to_string()))?;
        let from: Mailbox = sender
            .parse()
            .map_err(|e| InfrastructureError::Config(format!("Invalid sender address: {}", e)))?;

        let has_user = !config.smtp_user.is_empty();
        let has_password = !config.smtp_password.is_empty();
        if has_user != has_password {
            return Err(InfrastructureError::Config(
                "SMTP user and password must both be provided or both be empty".to_string(),
            ));
        }

        let transport = if config.insecure {
            tracing::warn!(
                host = %host,
                port = config.smtp_port,
                "Using insecure (unencrypted) SMTP transport - only use for local development!"
            );
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
                .port(config.smtp_port)
                .build()
        } else {
            // Implicit TLS on 465, STARTTLS otherwise
            let builder = if config.smtp_port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(host)?
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            };
            let builder = builder.port(config.smtp_port);

            if has_user {
                builder
                    .credentials(Credentials::new(
                        config.smtp_user.clone(),
                        config.smtp_password.clone(),
                    ))
                    .build()
            } else {
                builder.build()
            }
        };

        tracing::info!(host = %host, port = config.smtp_port, "SMTP email sender configured");

        Ok(Self {
            from,
            transport,
            renderer: TemplateRenderer::from_dir(config.template_dir.as_deref()),
        })
    }

    async fn deliver(&self, email: &VerificationEmail) -> Result<(), InfrastructureError> {
        let body = self.renderer.render(&email.template_id, &email.data).await?;

        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| InfrastructureError::Email(format!("Invalid recipient address: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(body.text, body.html))
            .map_err(|e| InfrastructureError::Email(format!("Failed to build email message: {}", e)))?;

        self.transport.send(message).await?;
        Ok(())
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_verification_email(&self, email: &VerificationEmail) -> Result<(), EmailError> {
        match self.deliver(email).await {
            Ok(()) => {
                tracing::info!(
                    provider = "smtp",
                    to = %mask_email(&email.to),
                    template = %email.template_id,
                    "Verification email sent"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    provider = "smtp",
                    to = %mask_email(&email.to),
                    template = %email.template_id,
                    error = %e,
                    "Failed to send verification email"
                );
                Err(e.into())
            }
        }
    }
}
