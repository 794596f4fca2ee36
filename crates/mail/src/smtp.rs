//! SMTP delivery via `lettre`.
//!
//! Configuration is loaded from environment variables; if `SMTP_HOST` is not
//! set, [`SmtpConfig::from_env`] returns `None` and the caller should fall
//! back to [`crate::LogMailer`].

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::message::OutgoingEmail;
use crate::{MailError, Mailer};

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Configuration for the SMTP transport.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl SmtpConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable        | Required | Default |
    /// |-----------------|----------|---------|
    /// | `SMTP_HOST`     | yes      | --      |
    /// | `SMTP_PORT`     | no       | `587`   |
    /// | `SMTP_USER`     | no       | --      |
    /// | `SMTP_PASSWORD` | no       | --      |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Sends mail through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

/// Assemble the MIME message for an [`OutgoingEmail`].
fn build_message(email: &OutgoingEmail) -> Result<Message, MailError> {
    Message::builder()
        .from(email.from.parse()?)
        .to(email.to.parse()?)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = build_message(email)?;
        self.transport.send(message).await?;
        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}
