/**
 * Real-time Event System
 *
 * This module defines the events pushed over a live connection. The
 * presence registry broadcasts `getOnlineUsers` to everyone, the message
 * relay pushes `newMessage` to exactly one connection, and a connection
 * that loses its user to a newer one receives `sessionReplaced`.
 */
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::message::Message;

/// Type of real-time event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    /// Current online-user set, broadcast to all connections
    GetOnlineUsers,
    /// Freshly persisted message, sent to the receiver's connection
    NewMessage,
    /// The user opened a newer connection; this one is no longer registered
    SessionReplaced,
}

impl EventType {
    /// Event name on the wire (SSE `event:` field)
    pub fn name(&self) -> &'static str {
        match self {
            EventType::GetOnlineUsers => "getOnlineUsers",
            EventType::NewMessage => "newMessage",
            EventType::SessionReplaced => "sessionReplaced",
        }
    }
}

/// Real-time event delivered to one or all connections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealtimeEvent {
    /// Type of event
    pub event_type: EventType,
    /// Event payload (JSON-serializable data)
    pub payload: serde_json::Value,
    /// Timestamp when event occurred
    pub timestamp: String,
}

impl RealtimeEvent {
    /// Create a new real-time event
    pub fn new(event_type: EventType, payload: serde_json::Value) -> Self {
        Self {
            event_type,
            payload,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create an online-users event
    pub fn online_users(user_ids: &[String]) -> Self {
        Self::new(EventType::GetOnlineUsers, serde_json::json!(user_ids))
    }

    /// Create a new-message event carrying the full message
    pub fn new_message(message: &Message) -> Result<Self, SharedError> {
        let payload = serde_json::to_value(message)?;
        Ok(Self::new(EventType::NewMessage, payload))
    }

    /// Create a session-replaced event
    pub fn session_replaced(user_id: &str) -> Self {
        Self::new(
            EventType::SessionReplaced,
            serde_json::json!({ "userId": user_id }),
        )
    }
}
