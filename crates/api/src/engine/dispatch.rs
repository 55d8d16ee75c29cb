//! Dispatch bookkeeping around [`NotificationDispatcher`].
//!
//! The dispatcher itself never touches the database. This module loads a
//! consistent snapshot of the alert and its affected clients, hands it to
//! the dispatcher, then appends the log rows and stamps each link with its
//! outcome.

use regwatch_core::error::CoreError;
use regwatch_core::notification::DispatchSummary;
use regwatch_core::types::DbId;
use regwatch_db::models::affected_client::AffectedClient;
use regwatch_db::models::alert::RegulatoryAlert;
use regwatch_db::repositories::{AffectedClientRepo, AlertRepo, NotificationLogRepo};
use regwatch_notify::{DispatchReport, NotificationDispatcher, OrganizationReport};
use serde::Serialize;
use sqlx::PgPool;

use super::not_found;
use crate::error::{AppError, AppResult};

/// `{sent, errors}` plus the per-organization breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    #[serde(flatten)]
    pub summary: DispatchSummary,
    pub organizations: Vec<OrganizationReport>,
}

impl From<DispatchReport> for DispatchOutcome {
    fn from(report: DispatchReport) -> Self {
        Self {
            summary: report.summary(),
            organizations: report.organizations,
        }
    }
}

/// Notify every affected organization of a published alert.
pub async fn dispatch_alert(
    pool: &PgPool,
    dispatcher: &NotificationDispatcher,
    alert_id: DbId,
) -> AppResult<DispatchOutcome> {
    let (alert, links) = load_snapshot(pool, alert_id).await?;

    let report = dispatcher.dispatch(&alert, &links).await?;
    record(pool, &report).await?;

    let outcome = DispatchOutcome::from(report);
    tracing::debug!(
        alert_id,
        organizations = outcome.organizations.len(),
        "Dispatch outcome recorded",
    );
    Ok(outcome)
}

/// Re-run dispatch for an already published alert.
///
/// Every recipient is contacted again; log rows are appended, never
/// replaced.
pub async fn resend(
    pool: &PgPool,
    dispatcher: &NotificationDispatcher,
    alert_id: DbId,
) -> AppResult<DispatchOutcome> {
    tracing::info!(alert_id, "Resending alert notifications");
    dispatch_alert(pool, dispatcher, alert_id).await
}

/// Read the alert and its links under a share lock so a concurrent save
/// cannot interleave, then release it before any network I/O.
async fn load_snapshot(
    pool: &PgPool,
    alert_id: DbId,
) -> AppResult<(RegulatoryAlert, Vec<AffectedClient>)> {
    let mut tx = pool.begin().await?;

    let alert = AlertRepo::lock_for_share(&mut tx, alert_id)
        .await?
        .ok_or_else(|| not_found("RegulatoryAlert", alert_id))?;
    if !alert.status.is_published() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Alert {alert_id} is not published (status '{}')",
            alert.status
        ))));
    }

    let links = AffectedClientRepo::list_for_alert_in(&mut tx, alert_id).await?;
    tx.commit().await?;

    Ok((alert, links))
}

async fn record(pool: &PgPool, report: &DispatchReport) -> AppResult<()> {
    NotificationLogRepo::append(pool, &report.log_entries()).await?;

    for org in &report.organizations {
        let updated = AffectedClientRepo::record_notification(
            pool,
            org.affected_client_id,
            org.status,
            org.completed_at,
        )
        .await?;
        if !updated {
            tracing::debug!(
                affected_client_id = org.affected_client_id,
                "Affected client replaced during dispatch; outcome kept in log only",
            );
        }
    }
    Ok(())
}
