//! Route definitions for `/action-items`.

use axum::routing::put;
use axum::Router;

use crate::handlers::action_items;
use crate::state::AppState;

/// Routes mounted at `/action-items`.
///
/// ```text
/// PUT    /{id}    -> update_action_item
/// DELETE /{id}    -> delete_action_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(action_items::update_action_item).delete(action_items::delete_action_item),
    )
}
