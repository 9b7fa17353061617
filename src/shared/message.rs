/**
 * Message Data Structure
 *
 * This module defines the Message struct used for direct messages between
 * two users, and the request body clients send to create one.
 *
 * A message is created once by the send-message path, persisted, and then
 * forwarded as-is to the receiver's live connection. It is never mutated
 * afterwards; the only way a message disappears is the bulk delete that
 * runs when one of its two owners deletes their account.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single direct message
///
/// The JSON shape keeps the field names the web client consumes
/// (`_id`, `senderId`, `receiverId`, `createdAt`, ...). The same value is
/// returned from `POST /api/messages/send/{id}` and carried in the
/// `newMessage` realtime event, so both paths deliver identical payloads.
///
/// # Example
/// ```rust
/// use duetchat::shared::Message;
///
/// let message = Message::new(
///     "sender-id".to_string(),
///     "receiver-id".to_string(),
///     Some("Hello!".to_string()),
///     None,
/// );
/// assert_eq!(message.created_at, message.updated_at);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "ssr", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message ID (UUID v4)
    #[serde(rename = "_id")]
    pub id: String,
    /// User who sent the message
    pub sender_id: String,
    /// User the message is addressed to
    pub receiver_id: String,
    /// Optional text body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Optional hosted image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Always equal to `created_at`; messages are immutable
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message with a fresh id and the current timestamp
    pub fn new(
        sender_id: String,
        receiver_id: String,
        text: Option<String>,
        image: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id,
            receiver_id,
            text,
            image,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request body for `POST /api/messages/send/{id}`
///
/// `image` is a base64 data URI that the server uploads to the asset host
/// before persisting; only the hosted URL is stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl SendMessageRequest {
    /// Drop blank text and empty image fields
    pub fn normalized(self) -> Self {
        Self {
            text: self.text.filter(|text| !text.trim().is_empty()),
            image: self.image.filter(|image| !image.is_empty()),
        }
    }

    /// True when neither text nor image carries content
    pub fn is_empty(&self) -> bool {
        let has_text = self.text.as_deref().is_some_and(|t| !t.trim().is_empty());
        let has_image = self.image.as_deref().is_some_and(|i| !i.is_empty());
        !has_text && !has_image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_json_field_names() {
        let message = Message::new(
            "alice".to_string(),
            "bob".to_string(),
            Some("hi".to_string()),
            None,
        );
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["_id"], message.id.as_str());
        assert_eq!(json["senderId"], "alice");
        assert_eq!(json["receiverId"], "bob");
        assert_eq!(json["text"], "hi");
        assert!(json.get("image").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_send_request_empty_detection() {
        assert!(SendMessageRequest::default().is_empty());
        assert!(SendMessageRequest { text: Some("   ".into()), image: Some(String::new()) }.is_empty());
        assert!(!SendMessageRequest { text: Some("hey".into()), image: None }.is_empty());
        assert!(!SendMessageRequest { text: None, image: Some("data:image/png;base64,AA==".into()) }.is_empty());
    }

    #[test]
    fn test_send_request_normalized() {
        let request = SendMessageRequest { text: Some("  ".into()), image: Some("x".into()) }.normalized();
        assert_eq!(request.text, None);
        assert_eq!(request.image.as_deref(), Some("x"));
    }
}
