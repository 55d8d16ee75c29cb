//! Domain rules for the regulatory alert back-office.
//!
//! Everything in this crate is free of I/O: status vocabularies, the alert
//! state machine, publish validation, fan-out input checks, notification
//! status derivation and remediation audit text. The `db`, `notify` and
//! `api` crates build on these types.

pub mod affected_client;
pub mod alert;
pub mod error;
pub mod notification;
pub mod remediation;
pub mod roles;
pub mod search;
pub mod text_enum;
pub mod types;
