//! Handlers for notification dispatch and the delivery log (internal only).

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use regwatch_core::search::{clamp_limit, clamp_offset};
use regwatch_core::types::DbId;
use regwatch_db::repositories::{AlertRepo, NotificationLogRepo};
use regwatch_notify::NotificationDispatcher;
use serde::Serialize;

use crate::engine::{dispatch, not_found};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireInternal;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LOG_LIMIT: i64 = 100;
const MAX_LOG_LIMIT: i64 = 500;

/// Paged slice of the notification log.
#[derive(Debug, Serialize)]
pub struct NotificationLogPage<T> {
    pub items: Vec<T>,
    pub total: i64,
}

fn require_dispatcher(state: &AppState) -> AppResult<&NotificationDispatcher> {
    state
        .dispatcher
        .as_deref()
        .ok_or(AppError::DispatchUnavailable)
}

/// POST /api/v1/alerts/{id}/dispatch
pub async fn dispatch_alert(
    RequireInternal(_user): RequireInternal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let dispatcher = require_dispatcher(&state)?;
    let outcome = dispatch::dispatch_alert(&state.pool, dispatcher, id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/alerts/{id}/resend
pub async fn resend_alert(
    RequireInternal(_user): RequireInternal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let dispatcher = require_dispatcher(&state)?;
    let outcome = dispatch::resend(&state.pool, dispatcher, id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/alerts/{id}/notifications
///
/// Delivery attempts, most recent first.
pub async fn list_notifications(
    RequireInternal(_user): RequireInternal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    AlertRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("RegulatoryAlert", id))?;

    let limit = clamp_limit(params.limit, DEFAULT_LOG_LIMIT, MAX_LOG_LIMIT);
    let offset = clamp_offset(params.offset);
    let items = NotificationLogRepo::list_for_alert(&state.pool, id, limit, offset).await?;
    let total = NotificationLogRepo::count_for_alert(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: NotificationLogPage { items, total },
    }))
}
