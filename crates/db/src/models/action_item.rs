//! Alert-level action item models and DTOs.

use regwatch_core::remediation::{ActionStatus, Priority};
use regwatch_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `alert_action_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActionItem {
    pub id: DbId,
    pub alert_id: DbId,
    pub text: String,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub due_date: Option<Date>,
    #[sqlx(try_from = "String")]
    pub status: ActionStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding an action item to an alert.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActionItem {
    pub text: String,
    /// Defaults to `medium`.
    pub priority: Option<Priority>,
    pub due_date: Option<Date>,
}

/// DTO for updating an action item. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateActionItem {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Date>,
    pub status: Option<ActionStatus>,
}
