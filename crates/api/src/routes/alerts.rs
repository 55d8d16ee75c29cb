//! Route definitions for the `/alerts` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{action_items, alerts, client_actions, notifications};
use crate::state::AppState;

/// Routes mounted at `/alerts`.
///
/// ```text
/// GET    /                          -> list_alerts
/// POST   /                          -> create_alert
/// GET    /{id}                      -> get_alert
/// PUT    /{id}/draft                -> save_draft
/// POST   /{id}/adopt-suggestions    -> adopt_suggestions
/// POST   /{id}/publish              -> publish_alert
/// POST   /{id}/dismiss              -> dismiss_alert
/// POST   /{id}/restore              -> restore_alert
/// PUT    /{id}/status               -> update_status
/// GET    /{id}/history              -> status_history
/// POST   /{id}/dispatch             -> dispatch_alert
/// POST   /{id}/resend               -> resend_alert
/// GET    /{id}/notifications        -> list_notifications
/// POST   /{id}/action-items         -> create_action_item
/// GET    /{id}/client-actions       -> list_for_alert
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(alerts::list_alerts).post(alerts::create_alert))
        .route("/{id}", get(alerts::get_alert))
        .route("/{id}/draft", put(alerts::save_draft))
        .route("/{id}/adopt-suggestions", post(alerts::adopt_suggestions))
        .route("/{id}/publish", post(alerts::publish_alert))
        .route("/{id}/dismiss", post(alerts::dismiss_alert))
        .route("/{id}/restore", post(alerts::restore_alert))
        .route("/{id}/status", put(alerts::update_status))
        .route("/{id}/history", get(alerts::status_history))
        .route("/{id}/dispatch", post(notifications::dispatch_alert))
        .route("/{id}/resend", post(notifications::resend_alert))
        .route("/{id}/notifications", get(notifications::list_notifications))
        .route("/{id}/action-items", post(action_items::create_action_item))
        .route("/{id}/client-actions", get(client_actions::list_for_alert))
}
