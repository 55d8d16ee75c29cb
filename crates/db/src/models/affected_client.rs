//! Affected-client (fan-out) models and DTOs.

use regwatch_core::affected_client::ClientRisk;
use regwatch_core::notification::NotificationStatus;
use regwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Staging mirrors of risk / reason / comment, meaningful only pre-publish.
#[derive(Debug, Clone, Default, PartialEq, FromRow, Serialize)]
pub struct ClientSuggestion {
    pub suggested_risk: Option<String>,
    pub suggested_reason: Option<String>,
    pub suggested_comment: Option<String>,
}

/// A row from the `affected_clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AffectedClient {
    pub id: DbId,
    pub alert_id: DbId,
    pub organization_id: DbId,
    #[sqlx(try_from = "String")]
    pub risk: ClientRisk,
    pub reason: Option<String>,
    pub comment: Option<String>,
    #[sqlx(flatten)]
    #[serde(skip)]
    pub staged: ClientSuggestion,
    pub notified_at: Option<Timestamp>,
    /// One of `sent`, `partial`, `failed`, `no_recipients`; `None` until the
    /// first dispatch. See [`AffectedClient::notification_status`].
    pub notification_status: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AffectedClient {
    /// Parsed per-organization notification outcome.
    pub fn notification_status(&self) -> Option<NotificationStatus> {
        self.notification_status
            .as_deref()
            .and_then(|s| s.parse().ok())
    }
}

/// An affected client as returned to callers, with staging values attached
/// only while the owning alert is a draft.
#[derive(Debug, Clone, Serialize)]
pub struct AffectedClientEntry {
    #[serde(flatten)]
    pub link: AffectedClient,
    pub suggestion: Option<ClientSuggestion>,
}

impl AffectedClientEntry {
    /// Wrap a link, exposing its staging values only if `is_draft`.
    pub fn new(link: AffectedClient, is_draft: bool) -> Self {
        let suggestion = is_draft.then(|| link.staged.clone());
        Self { link, suggestion }
    }
}

/// One element of a fan-out snapshot passed to save / publish.
#[derive(Debug, Clone, Deserialize)]
pub struct AffectedClientInput {
    pub organization_id: DbId,
    pub risk: ClientRisk,
    pub reason: Option<String>,
    pub comment: Option<String>,
}
