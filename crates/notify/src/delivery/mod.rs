//! Concrete delivery channels.

pub mod email;
