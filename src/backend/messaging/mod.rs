//! Messaging Module
//!
//! This module stores direct messages and serves the conversation API.
//!
//! - **`db`** - message persistence
//! - **`service`** - persist-then-relay send path
//! - **`handlers`** - HTTP handlers

pub mod db;
pub mod handlers;
pub mod service;

pub use handlers::{get_messages, get_users, send_message};
pub use service::persist_and_relay;
