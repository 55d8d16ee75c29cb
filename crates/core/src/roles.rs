//! Well-known role name constants carried in access-token claims.

/// Full access, including administrative status corrections.
pub const ROLE_ADMIN: &str = "admin";

/// Internal compliance analyst: authors, publishes and dispatches alerts.
pub const ROLE_ANALYST: &str = "analyst";

/// Client-side operator acting on their own organization's actions.
pub const ROLE_CLIENT: &str = "client";

/// Whether the role belongs to the internal compliance team.
pub fn is_internal(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_ANALYST
}
