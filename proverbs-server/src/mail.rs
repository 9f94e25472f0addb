//! Outgoing mail
//!
//! Only the console backend exists: messages are written to the log. Setting
//! `MAIL_SERVER` gets the console mailer and a warning.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::MailConfig;

/// A plain-text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mail delivery error
#[derive(Debug, thiserror::Error)]
#[error("mail delivery failed: {0}")]
pub struct MailError(pub String);

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Writes messages to the log instead of sending them
#[derive(Debug, Default)]
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tracing::info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "mail (console backend)"
        );
        Ok(())
    }
}

/// Mailer for the configured backend.
pub fn mailer_for(config: &MailConfig) -> Arc<dyn Mailer> {
    if let Some(server) = &config.server {
        tracing::warn!(
            server = %server,
            "SMTP delivery is not available, mail will be logged instead"
        );
    }
    Arc::new(ConsoleMailer)
}

/// Message sent after a successful registration.
pub fn welcome_message(sender: &str, username: &str, email: &str) -> MailMessage {
    MailMessage {
        from: sender.to_owned(),
        to: email.to_owned(),
        subject: "Welcome".to_owned(),
        body: format!(
            "Welcome {username}!\n\nYour account is ready. Sign in at /login to read the proverbs.\n"
        ),
    }
}

/// Notice sent after a password change.
pub fn password_changed_message(sender: &str, username: &str, email: &str) -> MailMessage {
    MailMessage {
        from: sender.to_owned(),
        to: email.to_owned(),
        subject: "Your password has been changed".to_owned(),
        body: format!(
            "Hello {username},\n\nThe password for your account was just changed. \
             If this wasn't you, contact an administrator.\n"
        ),
    }
}
