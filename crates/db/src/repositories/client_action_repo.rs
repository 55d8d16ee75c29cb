//! Repository for the `client_actions` and `client_action_comments` tables.

use std::collections::HashMap;

use regwatch_core::remediation::ActionStatus;
use regwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::client_action::{
    AffectedClientLabel, ClientAction, ClientActionComment, ClientActionOwner,
    ClientActionWithComments, CreateClientAction, OrganizationActions,
};

/// Column list for `client_actions` queries.
const COLUMNS: &str =
    "id, affected_client_id, text, due_date, status, created_by, created_at, updated_at";

/// Column list for `client_action_comments` queries.
const COMMENT_COLUMNS: &str = "id, client_action_id, author_id, body, is_system, created_at";

/// Label columns for grouped views (affected client + alert + organization).
const LABEL_COLUMNS: &str = "ac.id AS affected_client_id, ac.alert_id, a.title AS alert_title, \
    ac.organization_id, o.name AS organization_name, ac.risk";

/// Persistence for per-client remediation actions and their comment trail.
pub struct ClientActionRepo;

impl ClientActionRepo {
    /// Add an action for an affected client. Status starts at `offen`.
    pub async fn create(
        pool: &PgPool,
        affected_client_id: DbId,
        input: &CreateClientAction,
        created_by: DbId,
    ) -> Result<ClientAction, sqlx::Error> {
        let query = format!(
            "INSERT INTO client_actions (affected_client_id, text, due_date, status, created_by) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientAction>(&query)
            .bind(affected_client_id)
            .bind(&input.text)
            .bind(input.due_date)
            .bind(ActionStatus::Offen.as_str())
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a client action by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ClientAction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM client_actions WHERE id = $1");
        sqlx::query_as::<_, ClientAction>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Which alert and organization a client action belongs to.
    pub async fn owner(pool: &PgPool, id: DbId) -> Result<Option<ClientActionOwner>, sqlx::Error> {
        sqlx::query_as::<_, ClientActionOwner>(
            "SELECT ac.id AS affected_client_id, ac.alert_id, ac.organization_id \
             FROM client_actions ca \
             JOIN affected_clients ac ON ac.id = ca.affected_client_id \
             WHERE ca.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Load a client action and hold a row lock until the transaction ends.
    pub async fn lock_for_update(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<ClientAction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM client_actions WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, ClientAction>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Set the status of a locked client action.
    pub async fn set_status(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
        status: ActionStatus,
    ) -> Result<ClientAction, sqlx::Error> {
        let query = format!(
            "UPDATE client_actions SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientAction>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    /// Append a user comment.
    pub async fn add_comment(
        pool: &PgPool,
        client_action_id: DbId,
        author_id: DbId,
        body: &str,
    ) -> Result<ClientActionComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO client_action_comments (client_action_id, author_id, body, is_system) \
             VALUES ($1, $2, $3, false) \
             RETURNING {COMMENT_COLUMNS}"
        );
        sqlx::query_as::<_, ClientActionComment>(&query)
            .bind(client_action_id)
            .bind(author_id)
            .bind(body)
            .fetch_one(pool)
            .await
    }

    /// Append a system (audit) comment within an existing transaction.
    pub async fn add_system_comment(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        client_action_id: DbId,
        author_id: DbId,
        body: &str,
    ) -> Result<ClientActionComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO client_action_comments (client_action_id, author_id, body, is_system) \
             VALUES ($1, $2, $3, true) \
             RETURNING {COMMENT_COLUMNS}"
        );
        sqlx::query_as::<_, ClientActionComment>(&query)
            .bind(client_action_id)
            .bind(author_id)
            .bind(body)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a comment by ID.
    pub async fn find_comment(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ClientActionComment>, sqlx::Error> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM client_action_comments WHERE id = $1");
        sqlx::query_as::<_, ClientActionComment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a comment. Returns `true` if a row was removed.
    pub async fn delete_comment(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM client_action_comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Comment trail of one action, oldest first.
    pub async fn list_comments(
        pool: &PgPool,
        client_action_id: DbId,
    ) -> Result<Vec<ClientActionComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM client_action_comments \
             WHERE client_action_id = $1 \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ClientActionComment>(&query)
            .bind(client_action_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Grouped views
    // -----------------------------------------------------------------------

    /// Client actions of an alert, grouped per affected organization.
    ///
    /// Every affected client appears, including those without actions.
    pub async fn list_grouped_for_alert(
        pool: &PgPool,
        alert_id: DbId,
    ) -> Result<Vec<OrganizationActions>, sqlx::Error> {
        let query = format!(
            "SELECT {LABEL_COLUMNS} \
             FROM affected_clients ac \
             JOIN regulatory_alerts a ON a.id = ac.alert_id \
             JOIN organizations o ON o.id = ac.organization_id \
             WHERE ac.alert_id = $1 \
             ORDER BY o.name, ac.id"
        );
        let labels = sqlx::query_as::<_, AffectedClientLabel>(&query)
            .bind(alert_id)
            .fetch_all(pool)
            .await?;
        Self::assemble(pool, labels).await
    }

    /// Client actions of one organization across all published alerts.
    pub async fn list_grouped_for_organization(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<OrganizationActions>, sqlx::Error> {
        let query = format!(
            "SELECT {LABEL_COLUMNS} \
             FROM affected_clients ac \
             JOIN regulatory_alerts a ON a.id = ac.alert_id \
             JOIN organizations o ON o.id = ac.organization_id \
             WHERE ac.organization_id = $1 \
               AND a.status IN ('new', 'acknowledged', 'in_progress', 'resolved') \
             ORDER BY a.published_at DESC NULLS LAST, ac.id"
        );
        let labels = sqlx::query_as::<_, AffectedClientLabel>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await?;
        Self::assemble(pool, labels).await
    }

    /// Attach actions and their comments to each label with two batch queries.
    async fn assemble(
        pool: &PgPool,
        labels: Vec<AffectedClientLabel>,
    ) -> Result<Vec<OrganizationActions>, sqlx::Error> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }

        let link_ids: Vec<DbId> = labels.iter().map(|l| l.affected_client_id).collect();
        let query = format!(
            "SELECT {COLUMNS} FROM client_actions \
             WHERE affected_client_id = ANY($1) \
             ORDER BY created_at, id"
        );
        let actions = sqlx::query_as::<_, ClientAction>(&query)
            .bind(&link_ids)
            .fetch_all(pool)
            .await?;

        let action_ids: Vec<DbId> = actions.iter().map(|a| a.id).collect();
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM client_action_comments \
             WHERE client_action_id = ANY($1) \
             ORDER BY created_at, id"
        );
        let comments = sqlx::query_as::<_, ClientActionComment>(&query)
            .bind(&action_ids)
            .fetch_all(pool)
            .await?;

        let mut comments_by_action: HashMap<DbId, Vec<ClientActionComment>> = HashMap::new();
        for comment in comments {
            comments_by_action
                .entry(comment.client_action_id)
                .or_default()
                .push(comment);
        }

        let mut actions_by_link: HashMap<DbId, Vec<ClientActionWithComments>> = HashMap::new();
        for action in actions {
            let comments = comments_by_action.remove(&action.id).unwrap_or_default();
            actions_by_link
                .entry(action.affected_client_id)
                .or_default()
                .push(ClientActionWithComments { action, comments });
        }

        Ok(labels
            .into_iter()
            .map(|label| OrganizationActions {
                actions: actions_by_link
                    .remove(&label.affected_client_id)
                    .unwrap_or_default(),
                affected_client_id: label.affected_client_id,
                alert_id: label.alert_id,
                alert_title: label.alert_title,
                organization_id: label.organization_id,
                organization_name: label.organization_name,
                risk: label.risk,
            })
            .collect())
    }
}
