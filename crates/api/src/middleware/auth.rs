//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use regwatch_core::error::CoreError;
use regwatch_core::roles;
use regwatch_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name.
    pub role: String,
    /// Organization of a client user.
    pub organization_id: Option<DbId>,
}

impl AuthUser {
    /// Whether the user belongs to the internal compliance team.
    pub fn is_internal(&self) -> bool {
        roles::is_internal(&self.role)
    }

    /// Reject unless the user is internal or belongs to `organization_id`.
    pub fn ensure_organization(&self, organization_id: DbId) -> Result<(), AppError> {
        if self.is_internal() || self.organization_id == Some(organization_id) {
            return Ok(());
        }
        Err(AppError::Core(CoreError::Forbidden(
            "Access limited to your own organization".into(),
        )))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            organization_id: claims.org_id,
        })
    }
}
