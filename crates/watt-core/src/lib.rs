//! watt-core — Pure domain logic, no UI.
//!
//! The canned-response chat session, appliance catalog, mock billing and
//! profile data for the household energy assistant. Frontends (TUI, Web)
//! subscribe to chat events via tokio::broadcast.

pub mod appliances;
pub mod billing;
pub mod chat;
pub mod config;
pub mod error;
pub mod events;
pub mod profile;
pub mod responder;
pub mod types;
