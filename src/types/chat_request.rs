use serde::{Deserialize, Serialize};

/// Request body for `POST /chats/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Identifier of the chat this message belongs to.
    pub chat_id: String,

    /// The user's message text.
    pub content: String,

    /// Identifier of the sending user, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl ChatRequest {
    /// Creates a new chat request.
    pub fn new(chat_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            content: content.into(),
            user_id: None,
        }
    }

    /// Attaches a user identifier.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}
