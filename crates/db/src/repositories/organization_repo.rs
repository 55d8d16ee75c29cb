//! Repository for the `organizations` and `organization_contacts` tables.

use regwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::{
    CreateContact, CreateOrganization, Organization, OrganizationContact,
};

/// Column list for `organizations` queries.
const COLUMNS: &str = "id, name, is_active, created_at, updated_at";

/// Column list for `organization_contacts` queries.
const CONTACT_COLUMNS: &str =
    "id, organization_id, name, email, receives_alerts, created_at, updated_at";

/// Read access to client organizations and their contacts.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Insert an organization.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrganization,
    ) -> Result<Organization, sqlx::Error> {
        let query = format!("INSERT INTO organizations (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Organization>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find an organization by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE id = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Return the subset of `ids` that do not exist.
    pub async fn missing_ids(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT requested.id FROM UNNEST($1::BIGINT[]) AS requested(id) \
             WHERE NOT EXISTS (SELECT 1 FROM organizations o WHERE o.id = requested.id) \
             ORDER BY requested.id",
        )
        .bind(ids)
        .fetch_all(&mut **tx)
        .await
    }

    /// Insert a contact for an organization.
    pub async fn create_contact(
        pool: &PgPool,
        input: &CreateContact,
    ) -> Result<OrganizationContact, sqlx::Error> {
        let query = format!(
            "INSERT INTO organization_contacts (organization_id, name, email, receives_alerts) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {CONTACT_COLUMNS}"
        );
        sqlx::query_as::<_, OrganizationContact>(&query)
            .bind(input.organization_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.receives_alerts)
            .fetch_one(pool)
            .await
    }

    /// List the contacts of an organization designated to receive alerts.
    pub async fn list_alert_recipients(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<OrganizationContact>, sqlx::Error> {
        let query = format!(
            "SELECT {CONTACT_COLUMNS} FROM organization_contacts \
             WHERE organization_id = $1 AND receives_alerts = true \
             ORDER BY name, id"
        );
        sqlx::query_as::<_, OrganizationContact>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }
}
