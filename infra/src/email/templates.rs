//! Verification email templates
//!
//! A template id resolves to `{template_dir}/{id}.html` when a directory is
//! configured and the file exists, otherwise to one of the built-in templates.
//! `{{name}}` and `{{otp}}` placeholders are replaced with HTML-escaped values.

use std::path::{Path, PathBuf};

use pms_core::services::otp::VerificationEmailData;

use super::html_escape;
use crate::InfrastructureError;

/// Built-in template for account activation
pub const USER_ACTIVATION_TEMPLATE: &str = "user-activation-mail";

/// Built-in template for password reset
pub const FORGOT_PASSWORD_TEMPLATE: &str = "forgot-password-user-mail";

const USER_ACTIVATION_HTML: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Welcome, {{name}}!</h2>
  <p>Thanks for signing up. Use the code below to activate your account:</p>
  <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px;">{{otp}}</p>
  <p>This code expires in 5 minutes. If you did not create an account, you can ignore this email.</p>
</body>
</html>
"#;

const FORGOT_PASSWORD_HTML: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; color: #333;">
  <h2>Hello, {{name}}</h2>
  <p>We received a request to reset your password. Use the code below to continue:</p>
  <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px;">{{otp}}</p>
  <p>This code expires in 5 minutes. If you did not request a password reset, you can ignore this email.</p>
</body>
</html>
"#;

/// Rendered email bodies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub html: String,
    pub text: String,
}

/// Resolves template ids and fills in verification data
#[derive(Debug, Clone, Default)]
pub struct TemplateRenderer {
    template_dir: Option<PathBuf>,
}

impl TemplateRenderer {
    /// Renderer using only the built-in templates
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Renderer that looks in `template_dir` before the built-in templates
    pub fn with_dir(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: Some(template_dir.into()),
        }
    }

    pub fn from_dir(template_dir: Option<&Path>) -> Self {
        Self {
            template_dir: template_dir.map(Path::to_path_buf),
        }
    }

    /// Render the template `template_id` with `data`
    pub async fn render(
        &self,
        template_id: &str,
        data: &VerificationEmailData,
    ) -> Result<RenderedEmail, InfrastructureError> {
        let source = self.load(template_id).await?;
        let html = source
            .replace("{{name}}", &html_escape(&data.name))
            .replace("{{otp}}", &html_escape(&data.otp));

        let text = format!(
            "Hello {},\n\nYour verification code is: {}\n\nIf you did not request this code, you can ignore this email.\n",
            data.name, data.otp
        );

        Ok(RenderedEmail { html, text })
    }

    async fn load(&self, template_id: &str) -> Result<String, InfrastructureError> {
        if !is_valid_template_id(template_id) {
            return Err(InfrastructureError::Template(format!(
                "Invalid template id: {}",
                template_id
            )));
        }

        if let Some(dir) = &self.template_dir {
            let path = dir.join(format!("{}.html", template_id));
            match tokio::fs::read_to_string(&path).await {
                Ok(source) => return Ok(source),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(
                        template = template_id,
                        path = %path.display(),
                        "Template file not found, using built-in template"
                    );
                }
                Err(e) => {
                    return Err(InfrastructureError::Template(format!(
                        "Failed to read {}: {}",
                        path.display(),
                        e
                    )));
                }
            }
        }

        builtin_template(template_id)
            .map(str::to_string)
            .ok_or_else(|| InfrastructureError::Template(format!("Unknown template: {}", template_id)))
    }
}

fn builtin_template(template_id: &str) -> Option<&'static str> {
    match template_id {
        USER_ACTIVATION_TEMPLATE => Some(USER_ACTIVATION_HTML),
        FORGOT_PASSWORD_TEMPLATE => Some(FORGOT_PASSWORD_HTML),
        _ => None,
    }
}

// Ids become file names, so keep them to a safe character set
fn is_valid_template_id(template_id: &str) -> bool {
    !template_id.is_empty()
        && template_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
