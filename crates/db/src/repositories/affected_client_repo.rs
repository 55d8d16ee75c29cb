//! Repository for the `affected_clients` table (alert fan-out).

use regwatch_core::notification::NotificationStatus;
use regwatch_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::affected_client::{AffectedClient, AffectedClientInput};

/// Column list for `affected_clients` queries.
const COLUMNS: &str = "id, alert_id, organization_id, risk, reason, comment, \
    suggested_risk, suggested_reason, suggested_comment, \
    notified_at, notification_status, created_at, updated_at";

/// Persistence for the set of organizations impacted by an alert.
pub struct AffectedClientRepo;

impl AffectedClientRepo {
    /// Replace the whole fan-out of an alert within an existing transaction.
    ///
    /// Deletes every existing link, then inserts `clients` in order. When
    /// `mirror_suggestions` is set the staging columns receive the same
    /// values as the authoritative ones; otherwise they are left null.
    pub async fn replace_all(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        alert_id: DbId,
        clients: &[AffectedClientInput],
        mirror_suggestions: bool,
    ) -> Result<Vec<AffectedClient>, sqlx::Error> {
        sqlx::query("DELETE FROM affected_clients WHERE alert_id = $1")
            .bind(alert_id)
            .execute(&mut **tx)
            .await?;

        let query = format!(
            "INSERT INTO affected_clients \
                (alert_id, organization_id, risk, reason, comment, \
                 suggested_risk, suggested_reason, suggested_comment) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );

        let mut links = Vec::with_capacity(clients.len());
        for client in clients {
            let (suggested_risk, suggested_reason, suggested_comment) = if mirror_suggestions {
                (
                    Some(client.risk.as_str()),
                    client.reason.as_deref(),
                    client.comment.as_deref(),
                )
            } else {
                (None, None, None)
            };

            let link = sqlx::query_as::<_, AffectedClient>(&query)
                .bind(alert_id)
                .bind(client.organization_id)
                .bind(client.risk.as_str())
                .bind(&client.reason)
                .bind(&client.comment)
                .bind(suggested_risk)
                .bind(suggested_reason)
                .bind(suggested_comment)
                .fetch_one(&mut **tx)
                .await?;
            links.push(link);
        }

        Ok(links)
    }

    /// List the fan-out of an alert in insertion order.
    pub async fn list_for_alert(
        pool: &PgPool,
        alert_id: DbId,
    ) -> Result<Vec<AffectedClient>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM affected_clients WHERE alert_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, AffectedClient>(&query)
            .bind(alert_id)
            .fetch_all(pool)
            .await
    }

    /// Same as [`Self::list_for_alert`], inside an existing transaction.
    pub async fn list_for_alert_in(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        alert_id: DbId,
    ) -> Result<Vec<AffectedClient>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM affected_clients WHERE alert_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, AffectedClient>(&query)
            .bind(alert_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Find an affected-client link by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AffectedClient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM affected_clients WHERE id = $1");
        sqlx::query_as::<_, AffectedClient>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Record the outcome of a dispatch on the link.
    ///
    /// Returns `false` if the link no longer exists.
    pub async fn record_notification(
        pool: &PgPool,
        id: DbId,
        status: NotificationStatus,
        notified_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE affected_clients SET notification_status = $2, notified_at = $3 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(notified_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
