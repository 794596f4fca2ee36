//! Outgoing email for the YaMDb API.
//!
//! Handlers depend on the [`Mailer`] trait only. Three implementations exist:
//!
//! - [`SmtpMailer`] -- real delivery via `lettre` when `SMTP_HOST` is set.
//! - [`LogMailer`] -- development fallback that writes the message to the log.
//! - [`MemoryMailer`] -- keeps sent messages in memory for tests.

pub mod message;
pub mod smtp;

use std::sync::Mutex;

use async_trait::async_trait;

pub use message::{confirmation_email, OutgoingEmail};
pub use smtp::{SmtpConfig, SmtpMailer};

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Something that can deliver an [`OutgoingEmail`].
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Writes messages to the log instead of sending them.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        tracing::info!(
            to = %email.to,
            from = %email.from,
            subject = %email.subject,
            body = %email.body,
            "Email not sent (SMTP not configured)"
        );
        Ok(())
    }
}

/// Records every message; nothing leaves the process.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far, oldest first.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// The most recent message addressed to `to`.
    pub fn last_to(&self, to: &str) -> Option<OutgoingEmail> {
        self.sent().into_iter().rev().find(|m| m.to == to)
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        self.sent
            .lock()
            .map_err(|_| MailError::Build("mailbox lock poisoned".into()))?
            .push(email.clone());
        Ok(())
    }
}
