//! Handlers for alert-level action items (internal only).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use regwatch_core::types::DbId;
use regwatch_db::models::action_item::{CreateActionItem, UpdateActionItem};

use crate::engine::remediation;
use crate::error::AppResult;
use crate::middleware::rbac::RequireInternal;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/alerts/{id}/action-items
pub async fn create_action_item(
    RequireInternal(_user): RequireInternal,
    State(state): State<AppState>,
    Path(alert_id): Path<DbId>,
    Json(input): Json<CreateActionItem>,
) -> AppResult<impl IntoResponse> {
    let item = remediation::add_action_item(&state.pool, alert_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/v1/action-items/{id}
pub async fn update_action_item(
    RequireInternal(_user): RequireInternal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateActionItem>,
) -> AppResult<impl IntoResponse> {
    let item = remediation::update_action_item(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/action-items/{id}
pub async fn delete_action_item(
    RequireInternal(_user): RequireInternal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    remediation::delete_action_item(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
