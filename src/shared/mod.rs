//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and its clients. Every type here is designed for JSON
//! serialization over the HTTP API and the realtime stream.

/// Message data structure
pub mod message;

/// User profile data structure
pub mod user;

/// Real-time event system
pub mod event;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use message::{Message, SendMessageRequest};
pub use user::{Gender, UserProfile};
pub use event::{RealtimeEvent, EventType};
pub use error::SharedError;
