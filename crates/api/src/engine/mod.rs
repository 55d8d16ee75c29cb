//! Alert engine.
//!
//! Multi-step operations that must hold row locks, validate before writing
//! and commit as one unit live here; handlers stay thin.
//!
//! - [`lifecycle`]: drafting, publication and status transitions.
//! - [`dispatch`]: snapshot loading and bookkeeping around
//!   [`regwatch_notify::NotificationDispatcher`].
//! - [`remediation`]: action items, client actions and their audit trail.

pub mod dispatch;
pub mod lifecycle;
pub mod remediation;

use regwatch_core::error::CoreError;
use regwatch_core::types::DbId;

use crate::error::AppError;

/// Shorthand for a 404 on `entity` / `id`.
pub(crate) fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}
