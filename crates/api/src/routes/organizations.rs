//! Route definitions for `/organizations`.

use axum::routing::get;
use axum::Router;

use crate::handlers::client_actions;
use crate::state::AppState;

/// Routes mounted at `/organizations`.
///
/// ```text
/// GET    /{id}/client-actions    -> list_for_organization
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}/client-actions",
        get(client_actions::list_for_organization),
    )
}
