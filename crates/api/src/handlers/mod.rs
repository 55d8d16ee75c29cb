pub mod action_items;
pub mod alerts;
pub mod client_actions;
pub mod notifications;
