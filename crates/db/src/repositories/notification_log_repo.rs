//! Repository for the append-only `notification_log` table.
//!
//! Rows are only ever inserted; the table rejects UPDATE and DELETE at the
//! database level.

use regwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification_log::{NewLogEntry, NotificationLogEntry};

/// Column list for `notification_log` queries.
const COLUMNS: &str = "id, alert_id, organization_id, recipient_email, recipient_name, \
    status, error_message, sent_at, created_at";

/// Append and read delivery attempts.
pub struct NotificationLogRepo;

impl NotificationLogRepo {
    /// Append a batch of delivery attempts in one transaction.
    ///
    /// Returns the number of rows written.
    pub async fn append(pool: &PgPool, entries: &[NewLogEntry]) -> Result<u64, sqlx::Error> {
        if entries.is_empty() {
            return Ok(0);
        }

        let mut tx = pool.begin().await?;
        let mut written = 0;
        for entry in entries {
            let result = sqlx::query(
                "INSERT INTO notification_log \
                    (alert_id, organization_id, recipient_email, recipient_name, \
                     status, error_message, sent_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(entry.alert_id)
            .bind(entry.organization_id)
            .bind(&entry.recipient_email)
            .bind(&entry.recipient_name)
            .bind(entry.status.as_str())
            .bind(&entry.error_message)
            .bind(entry.sent_at)
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }
        tx.commit().await?;

        Ok(written)
    }

    /// Delivery attempts for an alert, newest first.
    pub async fn list_for_alert(
        pool: &PgPool,
        alert_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationLogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_log \
             WHERE alert_id = $1 \
             ORDER BY sent_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, NotificationLogEntry>(&query)
            .bind(alert_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of attempts logged for an alert.
    pub async fn count_for_alert(pool: &PgPool, alert_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM notification_log WHERE alert_id = $1")
            .bind(alert_id)
            .fetch_one(pool)
            .await
    }
}
