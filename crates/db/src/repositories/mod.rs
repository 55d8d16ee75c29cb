//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Steps that must share a
//! transaction with other writes take `&mut Transaction<'_, Postgres>`.

pub mod action_item_repo;
pub mod affected_client_repo;
pub mod alert_repo;
pub mod client_action_repo;
pub mod notification_log_repo;
pub mod organization_repo;

pub use action_item_repo::ActionItemRepo;
pub use affected_client_repo::AffectedClientRepo;
pub use alert_repo::AlertRepo;
pub use client_action_repo::ClientActionRepo;
pub use notification_log_repo::NotificationLogRepo;
pub use organization_repo::OrganizationRepo;
