//! Recipient resolution per organization.

use async_trait::async_trait;
use regwatch_core::types::DbId;
use regwatch_db::repositories::OrganizationRepo;
use regwatch_db::DbPool;

/// A notification-eligible contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub name: String,
    pub email: String,
}

/// Error returned when the directory cannot be consulted.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Recipient store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Recipient directory unavailable: {0}")]
    Unavailable(String),
}

/// Lists the contacts that receive alerts for an organization.
///
/// An empty list is a valid answer, not an error.
#[async_trait]
pub trait RecipientDirectory: Send + Sync {
    async fn recipients_for(&self, organization_id: DbId) -> Result<Vec<Recipient>, DirectoryError>;
}

/// Directory backed by the `organization_contacts` table.
#[derive(Clone)]
pub struct PgRecipientDirectory {
    pool: DbPool,
}

impl PgRecipientDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipientDirectory for PgRecipientDirectory {
    async fn recipients_for(&self, organization_id: DbId) -> Result<Vec<Recipient>, DirectoryError> {
        let contacts = OrganizationRepo::list_alert_recipients(&self.pool, organization_id).await?;
        Ok(contacts
            .into_iter()
            .map(|c| Recipient {
                name: c.name,
                email: c.email,
            })
            .collect())
    }
}
