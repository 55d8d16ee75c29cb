//! Client organization and contact models.
//!
//! Organizations and contacts are maintained by the profile editors; this
//! service reads them to resolve recipients and label grouped views.

use regwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `organizations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: DbId,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `organization_contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrganizationContact {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub email: String,
    /// Designated to receive regulatory alert notifications.
    pub receives_alerts: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an organization.
#[derive(Debug, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
}

/// DTO for creating a contact.
#[derive(Debug, Deserialize)]
pub struct CreateContact {
    pub organization_id: DbId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub receives_alerts: bool,
}
