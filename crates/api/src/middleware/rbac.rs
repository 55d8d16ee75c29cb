//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use regwatch_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `analyst` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn publish(RequireInternal(user): RequireInternal) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireInternal(pub AuthUser);

impl FromRequestParts<AppState> for RequireInternal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_internal() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Analyst or Admin role required".into(),
            )));
        }
        Ok(RequireInternal(user))
    }
}
