//! Notification log models.

use regwatch_core::notification::DeliveryStatus;
use regwatch_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `notification_log` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationLogEntry {
    pub id: DbId,
    pub alert_id: DbId,
    pub organization_id: DbId,
    pub recipient_email: String,
    pub recipient_name: String,
    #[sqlx(try_from = "String")]
    pub status: DeliveryStatus,
    pub error_message: Option<String>,
    pub sent_at: Timestamp,
    pub created_at: Timestamp,
}

/// A delivery attempt to be appended to the log.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub alert_id: DbId,
    pub organization_id: DbId,
    pub recipient_email: String,
    pub recipient_name: String,
    pub status: DeliveryStatus,
    pub error_message: Option<String>,
    pub sent_at: Timestamp,
}
