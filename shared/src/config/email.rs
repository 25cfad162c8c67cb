//! Email delivery configuration module

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outbound email configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Delivery provider (smtp, mock)
    #[serde(default = "default_provider")]
    pub provider: EmailProvider,

    /// SMTP server host
    #[serde(default)]
    pub smtp_host: String,

    /// SMTP server port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Well-known SMTP service name, used as the host when `smtp_host` is empty
    #[serde(default)]
    pub smtp_service: Option<String>,

    /// SMTP username, also used as the sender address when `from_address` is unset
    #[serde(default)]
    pub smtp_user: String,

    /// SMTP password
    #[serde(default)]
    pub smtp_password: String,

    /// Sender address
    #[serde(default)]
    pub from_address: Option<String>,

    /// Use an unencrypted SMTP connection (local development only)
    #[serde(default)]
    pub insecure: bool,

    /// Directory holding `{template}.html` files; built-in templates are used when unset
    #[serde(default)]
    pub template_dir: Option<PathBuf>,
}

/// Email provider enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    Smtp,
    Mock,
}

impl std::str::FromStr for EmailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smtp" => Ok(EmailProvider::Smtp),
            "mock" | "console" => Ok(EmailProvider::Mock),
            _ => Err(format!("Invalid email provider: {}", s)),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_service: None,
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_address: None,
            insecure: false,
            template_dir: None,
        }
    }
}

impl EmailConfig {
    /// Configuration for the console mock sender
    pub fn mock() -> Self {
        Self {
            provider: EmailProvider::Mock,
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Override fields with any `SMTP_*` / `EMAIL_*` variables that are set
    pub fn merge_env(mut self) -> Self {
        if let Some(provider) = std::env::var("EMAIL_PROVIDER").ok().and_then(|v| v.parse().ok()) {
            self.provider = provider;
        }
        if let Ok(host) = std::env::var("SMTP_HOST") {
            self.smtp_host = host;
        }
        if let Some(port) = std::env::var("SMTP_PORT").ok().and_then(|v| v.parse().ok()) {
            self.smtp_port = port;
        }
        if let Ok(service) = std::env::var("SMTP_SERVICE") {
            self.smtp_service = Some(service).filter(|s| !s.is_empty());
        }
        if let Ok(user) = std::env::var("SMTP_USER") {
            self.smtp_user = user;
        }
        if let Ok(password) = std::env::var("SMTP_PASSWORD") {
            self.smtp_password = password;
        }
        if let Ok(from) = std::env::var("EMAIL_FROM") {
            self.from_address = Some(from).filter(|s| !s.is_empty());
        }
        if let Ok(dir) = std::env::var("EMAIL_TEMPLATE_DIR") {
            self.template_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Host to connect to: explicit host first, then the service name
    ///
    /// Well-known service names (`gmail`, `outlook`, ...) resolve to their
    /// SMTP relay; any other service value is used as a host name.
    pub fn relay_host(&self) -> Option<&str> {
        if !self.smtp_host.is_empty() {
            return Some(self.smtp_host.as_str());
        }
        self.smtp_service
            .as_deref()
            .map(|service| well_known_service_host(service).unwrap_or(service))
    }

    /// Sender address: explicit address first, then the SMTP user
    pub fn sender(&self) -> Option<&str> {
        self.from_address
            .as_deref()
            .or_else(|| Some(self.smtp_user.as_str()).filter(|u| !u.is_empty()))
    }
}

fn well_known_service_host(service: &str) -> Option<&'static str> {
    match service.to_lowercase().as_str() {
        "gmail" => Some("smtp.gmail.com"),
        "outlook" | "hotmail" | "outlook365" => Some("smtp-mail.outlook.com"),
        "yahoo" => Some("smtp.mail.yahoo.com"),
        "sendgrid" => Some("smtp.sendgrid.net"),
        "mailgun" => Some("smtp.mailgun.org"),
        _ => None,
    }
}

fn default_provider() -> EmailProvider {
    EmailProvider::Smtp
}

fn default_smtp_port() -> u16 {
    587
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_defaults() {
        let config = EmailConfig::default();
        assert_eq!(config.provider, EmailProvider::Smtp);
        assert_eq!(config.smtp_port, 587);
        assert!(config.relay_host().is_none());
        assert!(config.sender().is_none());
    }

    #[test]
    fn test_relay_host_falls_back_to_service() {
        let config = EmailConfig {
            smtp_service: Some("smtp.gmail.com".to_string()),
            ..Default::default()
        };
        assert_eq!(config.relay_host(), Some("smtp.gmail.com"));

        let config = EmailConfig {
            smtp_host: "mail.internal".to_string(),
            ..config
        };
        assert_eq!(config.relay_host(), Some("mail.internal"));
    }

    #[test]
    fn test_relay_host_resolves_service_name() {
        let config = EmailConfig {
            smtp_service: Some("Gmail".to_string()),
            ..Default::default()
        };
        assert_eq!(config.relay_host(), Some("smtp.gmail.com"));
    }

    #[test]
    fn test_sender_falls_back_to_user() {
        let config = EmailConfig {
            smtp_user: "noreply@pms.dev".to_string(),
            ..Default::default()
        };
        assert_eq!(config.sender(), Some("noreply@pms.dev"));

        let config = EmailConfig {
            from_address: Some("PMS <hello@pms.dev>".to_string()),
            ..config
        };
        assert_eq!(config.sender(), Some("PMS <hello@pms.dev>"));
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("SMTP".parse::<EmailProvider>().unwrap(), EmailProvider::Smtp);
        assert_eq!("console".parse::<EmailProvider>().unwrap(), EmailProvider::Mock);
        assert!("pigeon".parse::<EmailProvider>().is_err());
    }
}
