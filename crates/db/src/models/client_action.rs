//! Client action and comment models and DTOs.

use regwatch_core::affected_client::ClientRisk;
use regwatch_core::remediation::ActionStatus;
use regwatch_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `client_actions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientAction {
    pub id: DbId,
    pub affected_client_id: DbId,
    pub text: String,
    pub due_date: Option<Date>,
    #[sqlx(try_from = "String")]
    pub status: ActionStatus,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `client_action_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientActionComment {
    pub id: DbId,
    pub client_action_id: DbId,
    pub author_id: DbId,
    pub body: String,
    /// `true` for the audit entries written on status changes.
    pub is_system: bool,
    pub created_at: Timestamp,
}

/// A client action with its comment trail (oldest first).
#[derive(Debug, Clone, Serialize)]
pub struct ClientActionWithComments {
    #[serde(flatten)]
    pub action: ClientAction,
    pub comments: Vec<ClientActionComment>,
}

/// Client actions of one affected client, labelled with the organization and
/// the alert they belong to.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizationActions {
    pub affected_client_id: DbId,
    pub alert_id: DbId,
    pub alert_title: String,
    pub organization_id: DbId,
    pub organization_name: String,
    pub risk: ClientRisk,
    pub actions: Vec<ClientActionWithComments>,
}

/// Join row used to build [`OrganizationActions`].
#[derive(Debug, Clone, FromRow)]
pub struct AffectedClientLabel {
    pub affected_client_id: DbId,
    pub alert_id: DbId,
    pub alert_title: String,
    pub organization_id: DbId,
    pub organization_name: String,
    #[sqlx(try_from = "String")]
    pub risk: ClientRisk,
}

/// Ownership lookup for a client action: which alert and organization.
#[derive(Debug, Clone, FromRow)]
pub struct ClientActionOwner {
    pub affected_client_id: DbId,
    pub alert_id: DbId,
    pub organization_id: DbId,
}

/// DTO for creating a client action.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClientAction {
    pub text: String,
    pub due_date: Option<Date>,
}

/// DTO for a client action status update.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClientActionStatus {
    pub status: ActionStatus,
}

/// DTO for adding a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub body: String,
}
