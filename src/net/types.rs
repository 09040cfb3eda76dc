//! Shared wire-protocol DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! Inbound payloads are parsed into typed structs and rejected explicitly
//! when malformed, instead of trusting transport JSON as-is. Field names
//! mirror the server's camelCase wire shape.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::HashMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A chat message as broadcast on `/topic/class/{classId}`.
///
/// The class context comes from the subscription, not the payload. Identity
/// for de-duplication is the `(id, timestamp)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Server-assigned message identifier.
    pub id: i64,
    /// Username of the author.
    pub sender_username: String,
    /// Role of the author (e.g. `"TEACHER"`, `"STUDENT"`).
    pub sender_role: String,
    /// Message text.
    pub content: String,
    /// ISO-8601 creation timestamp.
    pub timestamp: String,
}

impl ChatMessage {
    /// De-duplication key for at-least-once delivery tolerance.
    #[must_use]
    pub fn dedup_key(&self) -> (i64, &str) {
        (self.id, self.timestamp.as_str())
    }
}

/// Parse a transport frame body into a [`ChatMessage`].
///
/// # Errors
///
/// Returns a description of the rejection for malformed or shape-mismatched
/// bodies so the caller can log and drop the frame.
pub fn parse_chat_message(body: &str) -> Result<ChatMessage, String> {
    serde_json::from_str::<ChatMessage>(body)
        .map_err(|e| format!("malformed chat message frame: {e}"))
}

/// Outbound body for `/app/chat.sendMessage/{classId}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingChatMessage {
    /// Message text; the server stamps id, sender, and timestamp.
    pub content: String,
}

/// Response shape of `GET /api/chat/unread-counts`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCounts {
    /// Persisted unread count per class for the current user.
    #[serde(deserialize_with = "deserialize_class_id_map")]
    pub unread_by_class: HashMap<i64, u32>,
}

/// One enrolled class as supplied by `GET /api/classes`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    /// Unique class identifier.
    pub class_id: i64,
    /// Short class code shown in lists (e.g. `"CS101-A"`).
    pub class_code: String,
    /// Subject taught in the class.
    pub subject_name: String,
}

/// Current session as supplied by `GET /api/auth/session`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// Username used for self-message filtering and attribution.
    pub username: String,
    /// Bearer token for REST calls and the transport CONNECT header.
    pub token: String,
}

/// JSON object keys are strings on the wire; parse them into class ids.
fn deserialize_class_id_map<'de, D>(deserializer: D) -> Result<HashMap<i64, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, u32>::deserialize(deserializer)?;
    let mut out = HashMap::with_capacity(raw.len());
    for (key, value) in raw {
        let class_id: i64 = key
            .parse()
            .map_err(|_| D::Error::custom(format!("class id key {key:?} is not an integer")))?;
        out.insert(class_id, value);
    }
    Ok(out)
}
