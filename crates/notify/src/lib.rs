//! Notification dispatch for published regulatory alerts.
//!
//! - [`NotificationDispatcher`]: resolves recipients for every affected
//!   organization, then sends one individualized message per recipient
//!   through a bounded concurrent stream.
//! - [`MessageTransport`]: the outbound channel; [`SmtpTransport`] is the
//!   production implementation.
//! - [`RecipientDirectory`]: who receives alerts for an organization;
//!   [`PgRecipientDirectory`] reads `organization_contacts`.
//! - [`message`]: subject and body composition.

pub mod delivery;
pub mod directory;
pub mod dispatcher;
pub mod message;
pub mod transport;

pub use delivery::email::{EmailConfig, EmailError, SmtpTransport};
pub use directory::{DirectoryError, PgRecipientDirectory, Recipient, RecipientDirectory};
pub use dispatcher::{
    DeliveryAttempt, DispatchConfig, DispatchError, DispatchReport, NotificationDispatcher,
    OrganizationReport,
};
pub use message::OutboundMessage;
pub use transport::{MessageTransport, TransportError};
