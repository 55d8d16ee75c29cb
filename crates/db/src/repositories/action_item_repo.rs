//! Repository for the `alert_action_items` table.

use regwatch_core::remediation::Priority;
use regwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::action_item::{ActionItem, CreateActionItem, UpdateActionItem};

/// Column list for `alert_action_items` queries.
const COLUMNS: &str = "id, alert_id, text, priority, due_date, status, created_at, updated_at";

/// CRUD for the internal checklist of an alert.
pub struct ActionItemRepo;

impl ActionItemRepo {
    /// Add an action item to an alert.
    pub async fn create(
        pool: &PgPool,
        alert_id: DbId,
        input: &CreateActionItem,
    ) -> Result<ActionItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO alert_action_items (alert_id, text, priority, due_date) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActionItem>(&query)
            .bind(alert_id)
            .bind(&input.text)
            .bind(input.priority.unwrap_or(Priority::Medium).as_str())
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Find an action item by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ActionItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alert_action_items WHERE id = $1");
        sqlx::query_as::<_, ActionItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the action items of an alert in creation order.
    pub async fn list_for_alert(
        pool: &PgPool,
        alert_id: DbId,
    ) -> Result<Vec<ActionItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alert_action_items \
             WHERE alert_id = $1 \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ActionItem>(&query)
            .bind(alert_id)
            .fetch_all(pool)
            .await
    }

    /// Update an action item. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateActionItem,
    ) -> Result<Option<ActionItem>, sqlx::Error> {
        let query = format!(
            "UPDATE alert_action_items SET \
                text = COALESCE($2, text), \
                priority = COALESCE($3, priority), \
                due_date = COALESCE($4, due_date), \
                status = COALESCE($5, status) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActionItem>(&query)
            .bind(id)
            .bind(&input.text)
            .bind(input.priority.map(|p| p.as_str()))
            .bind(input.due_date)
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Delete an action item. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM alert_action_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
