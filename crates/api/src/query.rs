//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /alerts`.
#[derive(Debug, Deserialize)]
pub struct AlertListParams {
    /// Raw status filter; validated by the handler.
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
