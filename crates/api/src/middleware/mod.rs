//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireInternal`] -- Requires the `analyst` or `admin` role.

pub mod auth;
pub mod rbac;
