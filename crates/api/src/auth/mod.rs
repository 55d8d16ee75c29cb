//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Tokens are issued by the identity service shared with the rest of the
//! back office; this server only validates them.

pub mod jwt;
