//! Handlers for the `/alerts` resource: authoring, publication and status.
//!
//! Every endpoint here is internal-only ([`RequireInternal`]). Client users
//! reach published alerts through the client-action views.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use regwatch_core::alert::AlertStatus;
use regwatch_core::search::{clamp_limit, clamp_offset};
use regwatch_core::types::DbId;
use regwatch_db::models::alert::CreateAlert;
use regwatch_db::repositories::AlertRepo;

use crate::engine::lifecycle::{self, PublishRequest, SaveDraftRequest, StatusUpdateRequest};
use crate::error::AppResult;
use crate::middleware::rbac::RequireInternal;
use crate::query::AlertListParams;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

// ---------------------------------------------------------------------------
// POST /alerts
// ---------------------------------------------------------------------------

/// Create a draft alert. Returns 201.
pub async fn create_alert(
    RequireInternal(user): RequireInternal,
    State(state): State<AppState>,
    Json(input): Json<CreateAlert>,
) -> AppResult<impl IntoResponse> {
    let detail = lifecycle::create_alert(
        &state.pool,
        &state.config.home_jurisdiction,
        &input,
        user.user_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

// ---------------------------------------------------------------------------
// GET /alerts
// ---------------------------------------------------------------------------

/// List alerts, newest first, optionally filtered by `?status=`.
pub async fn list_alerts(
    RequireInternal(_user): RequireInternal,
    State(state): State<AppState>,
    Query(params): Query<AlertListParams>,
) -> AppResult<impl IntoResponse> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<AlertStatus>)
        .transpose()?;
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let alerts = AlertRepo::list(&state.pool, status, limit, offset).await?;
    Ok(Json(DataResponse { data: alerts }))
}

// ---------------------------------------------------------------------------
// GET /alerts/{id}
// ---------------------------------------------------------------------------

pub async fn get_alert(
    RequireInternal(_user): RequireInternal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = lifecycle::alert_detail(&state.pool, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// PUT /alerts/{id}/draft
// ---------------------------------------------------------------------------

/// Save draft fields and the complete affected-client set.
pub async fn save_draft(
    RequireInternal(user): RequireInternal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SaveDraftRequest>,
) -> AppResult<impl IntoResponse> {
    let detail = lifecycle::save_draft(&state.pool, id, &input, user.user_id).await?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// POST /alerts/{id}/adopt-suggestions
// ---------------------------------------------------------------------------

pub async fn adopt_suggestions(
    RequireInternal(user): RequireInternal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = lifecycle::adopt_suggestions(&state.pool, id, user.user_id).await?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// POST /alerts/{id}/publish
// ---------------------------------------------------------------------------

/// Publish a draft and notify affected organizations.
///
/// The publication stands even when dispatch fails; `dispatch` is then
/// `null` in the response.
pub async fn publish_alert(
    RequireInternal(user): RequireInternal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PublishRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = lifecycle::publish(
        &state.pool,
        state.dispatcher.as_deref(),
        id,
        &input,
        user.user_id,
    )
    .await?;

    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// POST /alerts/{id}/dismiss, POST /alerts/{id}/restore
// ---------------------------------------------------------------------------

pub async fn dismiss_alert(
    RequireInternal(user): RequireInternal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let alert = lifecycle::dismiss(&state.pool, id, user.user_id).await?;
    Ok(Json(DataResponse { data: alert }))
}

pub async fn restore_alert(
    RequireInternal(user): RequireInternal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let alert = lifecycle::restore(&state.pool, id, user.user_id).await?;
    Ok(Json(DataResponse { data: alert }))
}

// ---------------------------------------------------------------------------
// PUT /alerts/{id}/status
// ---------------------------------------------------------------------------

/// Move a published alert between `new`, `acknowledged`, `in_progress` and
/// `resolved`, or back to `draft`.
pub async fn update_status(
    RequireInternal(user): RequireInternal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdateRequest>,
) -> AppResult<impl IntoResponse> {
    let alert = lifecycle::update_status(&state.pool, id, input.status, user.user_id).await?;
    Ok(Json(DataResponse { data: alert }))
}

// ---------------------------------------------------------------------------
// GET /alerts/{id}/history
// ---------------------------------------------------------------------------

pub async fn status_history(
    RequireInternal(_user): RequireInternal,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let history = lifecycle::status_history(&state.pool, id).await?;
    Ok(Json(DataResponse { data: history }))
}
