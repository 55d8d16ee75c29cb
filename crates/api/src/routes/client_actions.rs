//! Route definitions for client remediation: `/affected-clients`,
//! `/client-actions` and `/client-action-comments`.

use axum::routing::{delete, post, put};
use axum::Router;

use crate::handlers::client_actions;
use crate::state::AppState;

/// Routes mounted at `/affected-clients`.
///
/// ```text
/// POST   /{id}/actions    -> create_client_action
/// ```
pub fn affected_clients_router() -> Router<AppState> {
    Router::new().route("/{id}/actions", post(client_actions::create_client_action))
}

/// Routes mounted at `/client-actions`.
///
/// ```text
/// PUT    /{id}/status      -> update_client_action_status
/// POST   /{id}/comments    -> create_comment
/// ```
pub fn client_actions_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/status",
            put(client_actions::update_client_action_status),
        )
        .route("/{id}/comments", post(client_actions::create_comment))
}

/// Routes mounted at `/client-action-comments`.
///
/// ```text
/// DELETE /{id}    -> delete_comment
/// ```
pub fn comments_router() -> Router<AppState> {
    Router::new().route("/{id}", delete(client_actions::delete_comment))
}
