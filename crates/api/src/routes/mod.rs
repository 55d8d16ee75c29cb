pub mod action_items;
pub mod alerts;
pub mod client_actions;
pub mod health;
pub mod organizations;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /alerts                                  list, create (internal)
/// /alerts/{id}                             get with affected clients + action items
/// /alerts/{id}/draft                       save draft (PUT)
/// /alerts/{id}/adopt-suggestions           adopt staging values (POST)
/// /alerts/{id}/publish                     publish + dispatch (POST)
/// /alerts/{id}/dismiss                     dismiss draft (POST)
/// /alerts/{id}/restore                     restore dismissed (POST)
/// /alerts/{id}/status                      status update (PUT)
/// /alerts/{id}/history                     status history (GET)
/// /alerts/{id}/dispatch                    dispatch (POST)
/// /alerts/{id}/resend                      resend (POST)
/// /alerts/{id}/notifications               delivery log (GET)
/// /alerts/{id}/action-items                add action item (POST)
/// /alerts/{id}/client-actions              client actions per organization (GET)
///
/// /action-items/{id}                       update, delete (internal)
///
/// /affected-clients/{id}/actions           add client action (org-scoped)
/// /client-actions/{id}/status              update status + audit comment (PUT)
/// /client-actions/{id}/comments            add comment (POST)
/// /client-action-comments/{id}             delete comment (DELETE)
///
/// /organizations/{id}/client-actions       one organization's actions (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/alerts", alerts::router())
        .nest("/action-items", action_items::router())
        .nest("/affected-clients", client_actions::affected_clients_router())
        .nest("/client-actions", client_actions::client_actions_router())
        .nest("/client-action-comments", client_actions::comments_router())
        .nest("/organizations", organizations::router())
}
