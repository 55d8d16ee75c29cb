//! Draft authoring, publication and status transitions.
//!
//! Every operation runs in one transaction that starts by locking the alert
//! row (`SELECT ... FOR UPDATE`), so saves, publications and transitions of
//! the same alert serialize. All checks happen before the first write; an
//! early return drops the transaction and rolls back.

use regwatch_core::affected_client;
use regwatch_core::alert::{self, AlertAction, AlertStatus};
use regwatch_core::error::CoreError;
use regwatch_core::types::{DbId, Timestamp};
use regwatch_db::models::affected_client::{AffectedClientEntry, AffectedClientInput};
use regwatch_db::models::alert::{
    AlertDetail, AlertFields, AlertStatusChange, CreateAlert, RegulatoryAlert,
};
use regwatch_db::repositories::{ActionItemRepo, AffectedClientRepo, AlertRepo, OrganizationRepo};
use regwatch_notify::NotificationDispatcher;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::dispatch::{self, DispatchOutcome};
use super::not_found;
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `PUT /alerts/{id}/draft`.
#[derive(Debug, Deserialize)]
pub struct SaveDraftRequest {
    #[serde(flatten)]
    pub fields: AlertFields,
    /// Complete fan-out; replaces the stored set.
    pub affected_clients: Vec<AffectedClientInput>,
    /// When present, the save fails with a conflict unless the alert was not
    /// modified since this timestamp.
    pub expected_updated_at: Option<Timestamp>,
}

/// Body of `POST /alerts/{id}/publish`.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    #[serde(flatten)]
    pub fields: AlertFields,
    /// Final fan-out; replaces the stored set.
    pub affected_clients: Vec<AffectedClientInput>,
}

/// Body of `PUT /alerts/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: AlertStatus,
}

/// Result of a publication.
#[derive(Debug, Serialize)]
pub struct PublishOutcome {
    pub alert: RegulatoryAlert,
    pub affected_clients: Vec<AffectedClientEntry>,
    /// `None` when dispatch was unavailable or aborted.
    pub dispatch: Option<DispatchOutcome>,
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Load an alert with its affected clients and action items.
pub async fn alert_detail(pool: &PgPool, id: DbId) -> AppResult<AlertDetail> {
    let alert = AlertRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found("RegulatoryAlert", id))?;
    build_detail(pool, alert).await
}

/// Status history of an alert, oldest first.
pub async fn status_history(pool: &PgPool, id: DbId) -> AppResult<Vec<AlertStatusChange>> {
    AlertRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found("RegulatoryAlert", id))?;
    Ok(AlertRepo::list_status_changes(pool, id).await?)
}

async fn build_detail(pool: &PgPool, alert: RegulatoryAlert) -> AppResult<AlertDetail> {
    let is_draft = alert.status == AlertStatus::Draft;
    let affected_clients = AffectedClientRepo::list_for_alert(pool, alert.id)
        .await?
        .into_iter()
        .map(|link| AffectedClientEntry::new(link, is_draft))
        .collect();
    let action_items = ActionItemRepo::list_for_alert(pool, alert.id).await?;

    Ok(AlertDetail {
        suggestion: alert.suggestion().cloned(),
        alert,
        affected_clients,
        action_items,
    })
}

// ---------------------------------------------------------------------------
// Draft authoring
// ---------------------------------------------------------------------------

/// Create a new alert in `draft`.
pub async fn create_alert(
    pool: &PgPool,
    home_jurisdiction: &str,
    input: &CreateAlert,
    actor: DbId,
) -> AppResult<AlertDetail> {
    alert::validate_title(&input.title)?;

    let alert = AlertRepo::create(pool, input, home_jurisdiction, Some(actor)).await?;
    tracing::info!(alert_id = alert.id, user_id = actor, "Alert draft created");

    Ok(AlertDetail {
        suggestion: alert.suggestion().cloned(),
        alert,
        affected_clients: Vec::new(),
        action_items: Vec::new(),
    })
}

/// Patch the authoritative fields of a draft and replace its fan-out.
///
/// Saved link values are mirrored into the staging columns so the next edit
/// session starts from them.
pub async fn save_draft(
    pool: &PgPool,
    id: DbId,
    input: &SaveDraftRequest,
    actor: DbId,
) -> AppResult<AlertDetail> {
    let mut tx = pool.begin().await?;

    let current = AlertRepo::lock_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| not_found("RegulatoryAlert", id))?;
    ensure_draft(&current)?;

    if let Some(expected) = input.expected_updated_at {
        if expected != current.updated_at {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Alert {id} was modified by someone else; reload and retry"
            ))));
        }
    }

    let mut content = current.content.clone();
    content.apply(&input.fields);
    alert::validate_title(&content.title)?;
    check_fan_out(&mut tx, &input.affected_clients).await?;

    let saved = AlertRepo::write_content(&mut tx, id, &content).await?;
    AffectedClientRepo::replace_all(&mut tx, id, &input.affected_clients, true).await?;
    tx.commit().await?;

    tracing::info!(
        alert_id = id,
        user_id = actor,
        affected_clients = input.affected_clients.len(),
        "Alert draft saved",
    );
    build_detail(pool, saved).await
}

/// Fill empty authoritative fields of a draft from its staging values.
pub async fn adopt_suggestions(pool: &PgPool, id: DbId, actor: DbId) -> AppResult<AlertDetail> {
    let mut tx = pool.begin().await?;

    let current = AlertRepo::lock_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| not_found("RegulatoryAlert", id))?;
    ensure_draft(&current)?;

    let mut content = current.content.clone();
    if !content.adopt(&current.staged) {
        drop(tx);
        return build_detail(pool, current).await;
    }

    let saved = AlertRepo::write_content(&mut tx, id, &content).await?;
    tx.commit().await?;

    tracing::info!(alert_id = id, user_id = actor, "Suggestions adopted into draft");
    build_detail(pool, saved).await
}

// ---------------------------------------------------------------------------
// Publication
// ---------------------------------------------------------------------------

/// Publish a draft: final fields, `draft -> new`, authoritative fan-out.
///
/// Dispatch runs after the commit and its outcome never affects the
/// publication. It is awaited so the caller receives `{sent, errors}`; the
/// response therefore waits for the slowest send, bounded by
/// `DISPATCH_SEND_TIMEOUT_SECS` per send and by the request timeout overall.
pub async fn publish(
    pool: &PgPool,
    dispatcher: Option<&NotificationDispatcher>,
    id: DbId,
    input: &PublishRequest,
    actor: DbId,
) -> AppResult<PublishOutcome> {
    let mut tx = pool.begin().await?;

    let current = AlertRepo::lock_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| not_found("RegulatoryAlert", id))?;
    let target = alert::next_status(current.status, AlertAction::Publish)?;

    let mut content = current.content.clone();
    content.apply(&input.fields);
    alert::validate_title(&content.title)?;
    alert::validate_publishable(&content.publish_requirements())?;
    check_fan_out(&mut tx, &input.affected_clients).await?;

    AlertRepo::write_content(&mut tx, id, &content).await?;
    AlertRepo::set_status(&mut tx, id, target).await?;
    AlertRepo::record_status_change(&mut tx, id, current.status, target, Some(actor)).await?;
    AffectedClientRepo::replace_all(&mut tx, id, &input.affected_clients, false).await?;
    tx.commit().await?;

    tracing::info!(
        alert_id = id,
        user_id = actor,
        affected_clients = input.affected_clients.len(),
        "Alert published",
    );

    let dispatch = match dispatcher {
        Some(dispatcher) => match dispatch::dispatch_alert(pool, dispatcher, id).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(alert_id = id, error = %e, "Dispatch after publication failed");
                None
            }
        },
        None => {
            tracing::warn!(alert_id = id, "No dispatcher configured; alert published without notification");
            None
        }
    };

    let alert = AlertRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found("RegulatoryAlert", id))?;
    let affected_clients = AffectedClientRepo::list_for_alert(pool, id)
        .await?
        .into_iter()
        .map(|link| AffectedClientEntry::new(link, false))
        .collect();

    Ok(PublishOutcome {
        alert,
        affected_clients,
        dispatch,
    })
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// `draft -> dismissed`.
pub async fn dismiss(pool: &PgPool, id: DbId, actor: DbId) -> AppResult<RegulatoryAlert> {
    transition(pool, id, AlertAction::Dismiss, actor).await
}

/// `dismissed -> draft`.
pub async fn restore(pool: &PgPool, id: DbId, actor: DbId) -> AppResult<RegulatoryAlert> {
    transition(pool, id, AlertAction::Restore, actor).await
}

/// Generic status update on a published alert. Moving back to `draft`
/// sends nothing.
pub async fn update_status(
    pool: &PgPool,
    id: DbId,
    target: AlertStatus,
    actor: DbId,
) -> AppResult<RegulatoryAlert> {
    transition(pool, id, AlertAction::SetStatus(target), actor).await
}

async fn transition(
    pool: &PgPool,
    id: DbId,
    action: AlertAction,
    actor: DbId,
) -> AppResult<RegulatoryAlert> {
    let mut tx = pool.begin().await?;

    let current = AlertRepo::lock_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| not_found("RegulatoryAlert", id))?;
    let target = alert::next_status(current.status, action)?;

    let updated = AlertRepo::set_status(&mut tx, id, target).await?;
    AlertRepo::record_status_change(&mut tx, id, current.status, target, Some(actor)).await?;
    tx.commit().await?;

    tracing::info!(
        alert_id = id,
        user_id = actor,
        from = %current.status,
        to = %target,
        "Alert status changed",
    );
    Ok(updated)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ensure_draft(alert: &RegulatoryAlert) -> Result<(), CoreError> {
    if alert.status == AlertStatus::Draft {
        Ok(())
    } else {
        Err(CoreError::NotDraft {
            id: alert.id,
            status: alert.status.to_string(),
        })
    }
}

/// Validate a fan-out snapshot: no duplicate organizations, bounded reasons,
/// every organization exists.
async fn check_fan_out(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    clients: &[AffectedClientInput],
) -> AppResult<()> {
    affected_client::validate_fan_out(
        clients
            .iter()
            .map(|c| (c.organization_id, c.reason.as_deref())),
    )?;

    if clients.is_empty() {
        return Ok(());
    }
    let ids: Vec<DbId> = clients.iter().map(|c| c.organization_id).collect();
    let missing = OrganizationRepo::missing_ids(tx, &ids).await?;
    if !missing.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown organization ids: {missing:?}"
        ))));
    }
    Ok(())
}
