//! Repository for the `regulatory_alerts` and `alert_status_changes` tables.

use regwatch_core::alert::AlertStatus;
use regwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::alert::{AlertContent, AlertStatusChange, CreateAlert, RegulatoryAlert};

/// Column list for `regulatory_alerts` queries.
const COLUMNS: &str = "id, title, source, jurisdiction, alert_date, category, severity, \
    summary, legal_basis, deadline, comment, status, \
    suggested_summary, suggested_legal_basis, suggested_severity, suggested_category, \
    suggested_comment, feed_entry_ref, source_url, \
    created_by, published_at, created_at, updated_at";

/// Column list for `alert_status_changes` queries.
const CHANGE_COLUMNS: &str = "id, alert_id, from_status, to_status, actor_id, created_at";

/// Persistence for regulatory alerts and their status history.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert a new alert in `draft` status.
    ///
    /// `default_jurisdiction` is used when the input leaves it unset.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAlert,
        default_jurisdiction: &str,
        created_by: Option<DbId>,
    ) -> Result<RegulatoryAlert, sqlx::Error> {
        let suggestion = input.suggestion.clone().unwrap_or_default();
        let jurisdiction = input
            .jurisdiction
            .as_deref()
            .unwrap_or(default_jurisdiction);

        let query = format!(
            "INSERT INTO regulatory_alerts \
                (title, source, jurisdiction, alert_date, category, severity, summary, \
                 legal_basis, deadline, comment, status, \
                 suggested_summary, suggested_legal_basis, suggested_severity, \
                 suggested_category, suggested_comment, feed_entry_ref, source_url, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, \
                     $12, $13, $14, $15, $16, $17, $18, $19) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RegulatoryAlert>(&query)
            .bind(&input.title)
            .bind(&input.source)
            .bind(jurisdiction)
            .bind(input.alert_date)
            .bind(&input.category)
            .bind(input.severity.unwrap_or_default().as_str())
            .bind(&input.summary)
            .bind(&input.legal_basis)
            .bind(input.deadline)
            .bind(&input.comment)
            .bind(AlertStatus::Draft.as_str())
            .bind(&suggestion.summary)
            .bind(&suggestion.legal_basis)
            .bind(suggestion.severity.map(|s| s.as_str()))
            .bind(&suggestion.category)
            .bind(&suggestion.comment)
            .bind(&suggestion.feed_entry_ref)
            .bind(&suggestion.source_url)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find an alert by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RegulatoryAlert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM regulatory_alerts WHERE id = $1");
        sqlx::query_as::<_, RegulatoryAlert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List alerts, newest first, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        status: Option<AlertStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RegulatoryAlert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM regulatory_alerts \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, RegulatoryAlert>(&query)
            .bind(status.map(|s| s.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Load an alert and hold a row lock until the transaction ends.
    ///
    /// Serializes concurrent saves and transitions of the same alert.
    pub async fn lock_for_update(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<RegulatoryAlert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM regulatory_alerts WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, RegulatoryAlert>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Load an alert under a shared lock.
    ///
    /// Blocks a concurrent save from replacing the fan-out while a dispatch
    /// reads it.
    pub async fn lock_for_share(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<RegulatoryAlert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM regulatory_alerts WHERE id = $1 FOR SHARE");
        sqlx::query_as::<_, RegulatoryAlert>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Overwrite the authoritative field group.
    pub async fn write_content(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        content: &AlertContent,
    ) -> Result<RegulatoryAlert, sqlx::Error> {
        let query = format!(
            "UPDATE regulatory_alerts SET \
                title = $2, source = $3, jurisdiction = $4, alert_date = $5, \
                category = $6, severity = $7, summary = $8, legal_basis = $9, \
                deadline = $10, comment = $11 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RegulatoryAlert>(&query)
            .bind(id)
            .bind(&content.title)
            .bind(&content.source)
            .bind(&content.jurisdiction)
            .bind(content.alert_date)
            .bind(&content.category)
            .bind(content.severity.as_str())
            .bind(&content.summary)
            .bind(&content.legal_basis)
            .bind(content.deadline)
            .bind(&content.comment)
            .fetch_one(&mut **tx)
            .await
    }

    /// Set the status. Entering `new` stamps `published_at` once.
    pub async fn set_status(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        status: AlertStatus,
    ) -> Result<RegulatoryAlert, sqlx::Error> {
        let query = format!(
            "UPDATE regulatory_alerts SET \
                status = $2, \
                published_at = CASE WHEN $2 = 'new' \
                    THEN COALESCE(published_at, NOW()) ELSE published_at END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RegulatoryAlert>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    // -----------------------------------------------------------------------
    // Status history
    // -----------------------------------------------------------------------

    /// Append a status transition to the history.
    pub async fn record_status_change(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        alert_id: DbId,
        from: AlertStatus,
        to: AlertStatus,
        actor_id: Option<DbId>,
    ) -> Result<AlertStatusChange, sqlx::Error> {
        let query = format!(
            "INSERT INTO alert_status_changes (alert_id, from_status, to_status, actor_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {CHANGE_COLUMNS}"
        );
        sqlx::query_as::<_, AlertStatusChange>(&query)
            .bind(alert_id)
            .bind(from.as_str())
            .bind(to.as_str())
            .bind(actor_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Status history of an alert, oldest first.
    pub async fn list_status_changes(
        pool: &PgPool,
        alert_id: DbId,
    ) -> Result<Vec<AlertStatusChange>, sqlx::Error> {
        let query = format!(
            "SELECT {CHANGE_COLUMNS} FROM alert_status_changes \
             WHERE alert_id = $1 \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, AlertStatusChange>(&query)
            .bind(alert_id)
            .fetch_all(pool)
            .await
    }
}
