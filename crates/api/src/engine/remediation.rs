//! Action items and per-client remediation.
//!
//! Client users may only touch rows that belong to their own organization
//! and never see anything attached to an unpublished (draft or dismissed)
//! alert. Internal users see
//! everything.

use regwatch_core::error::CoreError;
use regwatch_core::remediation::{self, ActionStatus};
use regwatch_core::roles::ROLE_ADMIN;
use regwatch_core::types::DbId;
use regwatch_db::models::action_item::{ActionItem, CreateActionItem, UpdateActionItem};
use regwatch_db::models::client_action::{
    ClientAction, ClientActionComment, ClientActionOwner, ClientActionWithComments,
    CreateClientAction, OrganizationActions,
};
use regwatch_db::repositories::{
    ActionItemRepo, AffectedClientRepo, AlertRepo, ClientActionRepo, OrganizationRepo,
};
use sqlx::PgPool;

use super::not_found;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

// ---------------------------------------------------------------------------
// Alert-level action items
// ---------------------------------------------------------------------------

pub async fn add_action_item(
    pool: &PgPool,
    alert_id: DbId,
    input: &CreateActionItem,
) -> AppResult<ActionItem> {
    remediation::validate_action_text(&input.text)?;
    AlertRepo::find_by_id(pool, alert_id)
        .await?
        .ok_or_else(|| not_found("RegulatoryAlert", alert_id))?;

    let item = ActionItemRepo::create(pool, alert_id, input).await?;
    tracing::info!(alert_id, action_item_id = item.id, "Action item added");
    Ok(item)
}

pub async fn update_action_item(
    pool: &PgPool,
    id: DbId,
    input: &UpdateActionItem,
) -> AppResult<ActionItem> {
    if let Some(text) = &input.text {
        remediation::validate_action_text(text)?;
    }
    ActionItemRepo::update(pool, id, input)
        .await?
        .ok_or_else(|| not_found("ActionItem", id))
}

pub async fn delete_action_item(pool: &PgPool, id: DbId) -> AppResult<()> {
    if !ActionItemRepo::delete(pool, id).await? {
        return Err(not_found("ActionItem", id));
    }
    tracing::info!(action_item_id = id, "Action item deleted");
    Ok(())
}

// ---------------------------------------------------------------------------
// Client actions
// ---------------------------------------------------------------------------

/// Add a remediation task for one affected client.
pub async fn add_client_action(
    pool: &PgPool,
    user: &AuthUser,
    affected_client_id: DbId,
    input: &CreateClientAction,
) -> AppResult<ClientAction> {
    remediation::validate_action_text(&input.text)?;

    let link = AffectedClientRepo::find_by_id(pool, affected_client_id)
        .await?
        .ok_or_else(|| not_found("AffectedClient", affected_client_id))?;
    ensure_visible(
        pool,
        user,
        &ClientActionOwner {
            affected_client_id,
            alert_id: link.alert_id,
            organization_id: link.organization_id,
        },
    )
    .await?;

    let action = ClientActionRepo::create(pool, affected_client_id, input, user.user_id).await?;
    tracing::info!(
        client_action_id = action.id,
        affected_client_id,
        user_id = user.user_id,
        "Client action added",
    );
    Ok(action)
}

/// Change a client action's status and append exactly one system comment
/// recording the change, even when the status is unchanged.
pub async fn update_client_action_status(
    pool: &PgPool,
    user: &AuthUser,
    id: DbId,
    status: ActionStatus,
) -> AppResult<ClientActionWithComments> {
    let owner = load_owner(pool, id).await?;
    ensure_visible(pool, user, &owner).await?;

    let mut tx = pool.begin().await?;
    let current = ClientActionRepo::lock_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| not_found("ClientAction", id))?;

    let action = ClientActionRepo::set_status(&mut tx, id, status).await?;
    let body = remediation::status_change_comment(current.status, status);
    ClientActionRepo::add_system_comment(&mut tx, id, user.user_id, &body).await?;
    tx.commit().await?;

    tracing::info!(
        client_action_id = id,
        user_id = user.user_id,
        from = %current.status,
        to = %status,
        "Client action status updated",
    );

    let comments = ClientActionRepo::list_comments(pool, id).await?;
    Ok(ClientActionWithComments { action, comments })
}

pub async fn add_comment(
    pool: &PgPool,
    user: &AuthUser,
    action_id: DbId,
    body: &str,
) -> AppResult<ClientActionComment> {
    remediation::validate_comment_body(body)?;
    let owner = load_owner(pool, action_id).await?;
    ensure_visible(pool, user, &owner).await?;

    Ok(ClientActionRepo::add_comment(pool, action_id, user.user_id, body).await?)
}

/// Delete a user comment. Only its author or an admin may do so; system
/// comments are permanent.
pub async fn delete_comment(pool: &PgPool, user: &AuthUser, comment_id: DbId) -> AppResult<()> {
    let comment = ClientActionRepo::find_comment(pool, comment_id)
        .await?
        .ok_or_else(|| not_found("ClientActionComment", comment_id))?;

    if comment.is_system {
        return Err(AppError::Core(CoreError::Forbidden(
            "System comments cannot be deleted".into(),
        )));
    }
    if comment.author_id != user.user_id && user.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the author may delete this comment".into(),
        )));
    }

    if !ClientActionRepo::delete_comment(pool, comment_id).await? {
        return Err(not_found("ClientActionComment", comment_id));
    }
    tracing::info!(comment_id, user_id = user.user_id, "Comment deleted");
    Ok(())
}

// ---------------------------------------------------------------------------
// Grouped views
// ---------------------------------------------------------------------------

/// Client actions of an alert grouped per affected organization. Client
/// users only get their own group.
pub async fn alert_client_actions(
    pool: &PgPool,
    user: &AuthUser,
    alert_id: DbId,
) -> AppResult<Vec<OrganizationActions>> {
    let alert = AlertRepo::find_by_id(pool, alert_id)
        .await?
        .ok_or_else(|| not_found("RegulatoryAlert", alert_id))?;
    if !user.is_internal() && !alert.status.is_published() {
        return Err(not_found("RegulatoryAlert", alert_id));
    }

    let mut groups = ClientActionRepo::list_grouped_for_alert(pool, alert_id).await?;
    if !user.is_internal() {
        groups.retain(|g| Some(g.organization_id) == user.organization_id);
    }
    Ok(groups)
}

/// Client actions of one organization across all published alerts.
pub async fn organization_client_actions(
    pool: &PgPool,
    user: &AuthUser,
    organization_id: DbId,
) -> AppResult<Vec<OrganizationActions>> {
    user.ensure_organization(organization_id)?;
    OrganizationRepo::find_by_id(pool, organization_id)
        .await?
        .ok_or_else(|| not_found("Organization", organization_id))?;

    Ok(ClientActionRepo::list_grouped_for_organization(pool, organization_id).await?)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_owner(pool: &PgPool, action_id: DbId) -> AppResult<ClientActionOwner> {
    ClientActionRepo::owner(pool, action_id)
        .await?
        .ok_or_else(|| not_found("ClientAction", action_id))
}

/// Organization scoping for client users. Rows under an unpublished alert
/// (draft or dismissed) are reported as missing.
async fn ensure_visible(pool: &PgPool, user: &AuthUser, owner: &ClientActionOwner) -> AppResult<()> {
    user.ensure_organization(owner.organization_id)?;
    if user.is_internal() {
        return Ok(());
    }
    let alert = AlertRepo::find_by_id(pool, owner.alert_id)
        .await?
        .ok_or_else(|| not_found("RegulatoryAlert", owner.alert_id))?;
    if !alert.status.is_published() {
        return Err(not_found("AffectedClient", owner.affected_client_id));
    }
    Ok(())
}
