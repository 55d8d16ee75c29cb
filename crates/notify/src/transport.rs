//! The outbound message channel.

use async_trait::async_trait;

use crate::delivery::email::EmailError;
use crate::message::OutboundMessage;

/// Error returned by a single send. Never aborts a dispatch; it is recorded
/// against the recipient and counted.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Email(#[from] EmailError),

    /// The remote side refused the message.
    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// Sends one composed message to one recipient.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}
