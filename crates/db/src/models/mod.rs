//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod action_item;
pub mod affected_client;
pub mod alert;
pub mod client_action;
pub mod notification_log;
pub mod organization;
