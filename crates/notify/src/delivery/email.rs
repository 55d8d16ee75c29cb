//! Email delivery via SMTP.
//!
//! [`SmtpTransport`] wraps the `lettre` async SMTP transport and implements
//! [`MessageTransport`]. Configuration is loaded from environment variables;
//! if `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns `None` and no
//! transport should be constructed.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::message::OutboundMessage;
use crate::transport::{MessageTransport, TransportError};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
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

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "alerts@regwatch.local";

/// Configuration for the SMTP transport.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, meaning notification
    /// dispatch is unavailable.
    ///
    /// | Variable        | Required | Default                  |
    /// |-----------------|----------|--------------------------|
    /// | `SMTP_HOST`     | yes      |                          |
    /// | `SMTP_PORT`     | no       | `587`                    |
    /// | `SMTP_FROM`     | no       | `alerts@regwatch.local`  |
    /// | `SMTP_USER`     | no       |                          |
    /// | `SMTP_PASSWORD` | no       |                          |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// SmtpTransport
// ---------------------------------------------------------------------------

/// Sends alert notifications as plain-text emails.
///
/// The mailer is built once and reused for every send.
pub struct SmtpTransport {
    from: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    /// Build the transport. Fails if the sender address or relay host is
    /// invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let from: Mailbox = config.from_address.parse()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            from,
            mailer: builder.build(),
        })
    }

    fn build_message(&self, message: &OutboundMessage) -> Result<Message, EmailError> {
        let to = Mailbox::new(Some(message.to_name.clone()), message.to_email.parse()?);
        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

#[async_trait]
impl MessageTransport for SmtpTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        let email = self.build_message(message)?;
        self.mailer.send(email).await.map_err(EmailError::from)?;

        tracing::info!(to = %message.to_email, subject = %message.subject, "Alert email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
