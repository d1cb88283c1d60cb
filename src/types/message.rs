use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The person planning the trip.
    User,
    /// The travel-planner assistant.
    Bot,
}

/// A single entry in a chat transcript.
///
/// A bot message opens as a streaming placeholder with empty content; the
/// content is appended in place while `is_streaming` is true and the
/// message becomes immutable once streaming ends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Unique identifier within the transcript.
    pub id: String,

    /// Author of the message.
    pub role: MessageRole,

    /// The message text.
    pub content: String,

    /// Creation time.
    #[serde(with = "crate::utils::time")]
    pub timestamp: OffsetDateTime,

    /// True while an assistant reply is still being streamed into this
    /// message.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_streaming: bool,
}

impl Message {
    /// Creates a completed message with the given content.
    pub fn new(id: impl Into<String>, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            timestamp: OffsetDateTime::now_utc(),
            is_streaming: false,
        }
    }

    /// Creates an empty bot placeholder that is still streaming.
    pub fn placeholder(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::Bot,
            content: String::new(),
            timestamp: OffsetDateTime::now_utc(),
            is_streaming: true,
        }
    }
}
