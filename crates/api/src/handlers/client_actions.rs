//! Handlers for per-client remediation actions and their comment threads.
//!
//! Open to client users for their own organization; organization scoping is
//! enforced in [`crate::engine::remediation`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use regwatch_core::types::DbId;
use regwatch_db::models::client_action::{
    CreateClientAction, CreateComment, UpdateClientActionStatus,
};

use crate::engine::remediation;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /affected-clients/{id}/actions
// ---------------------------------------------------------------------------

pub async fn create_client_action(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(affected_client_id): Path<DbId>,
    Json(input): Json<CreateClientAction>,
) -> AppResult<impl IntoResponse> {
    let action =
        remediation::add_client_action(&state.pool, &auth, affected_client_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: action })))
}

// ---------------------------------------------------------------------------
// PUT /client-actions/{id}/status
// ---------------------------------------------------------------------------

/// Update the status; the response carries the refreshed comment thread
/// including the new audit entry.
pub async fn update_client_action_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClientActionStatus>,
) -> AppResult<impl IntoResponse> {
    let action =
        remediation::update_client_action_status(&state.pool, &auth, id, input.status).await?;
    Ok(Json(DataResponse { data: action }))
}

// ---------------------------------------------------------------------------
// POST /client-actions/{id}/comments
// ---------------------------------------------------------------------------

pub async fn create_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<impl IntoResponse> {
    let comment = remediation::add_comment(&state.pool, &auth, id, &input.body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

// ---------------------------------------------------------------------------
// DELETE /client-action-comments/{id}
// ---------------------------------------------------------------------------

pub async fn delete_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    remediation::delete_comment(&state.pool, &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /alerts/{id}/client-actions
// ---------------------------------------------------------------------------

/// Client actions of an alert grouped per affected organization.
pub async fn list_for_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(alert_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let groups = remediation::alert_client_actions(&state.pool, &auth, alert_id).await?;
    Ok(Json(DataResponse { data: groups }))
}

// ---------------------------------------------------------------------------
// GET /organizations/{id}/client-actions
// ---------------------------------------------------------------------------

/// Client actions of one organization across published alerts.
pub async fn list_for_organization(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(organization_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let groups =
        remediation::organization_client_actions(&state.pool, &auth, organization_id).await?;
    Ok(Json(DataResponse { data: groups }))
}
