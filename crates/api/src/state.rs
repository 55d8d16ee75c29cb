use std::sync::Arc;

use regwatch_notify::NotificationDispatcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: regwatch_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Alert notification dispatcher; `None` when no transport is configured.
    pub dispatcher: Option<Arc<NotificationDispatcher>>,
}
