//! Ordered message history for a single chat.
//!
//! A [`Transcript`] owns the message list and enforces the streaming
//! lifecycle: a bot reply opens as an empty placeholder, grows by
//! appends while streaming, and becomes immutable once completed or
//! failed. At most one message is streaming at any time.

use crate::error::{Error, Result};
use crate::types::{Message, MessageRole};

/// The assistant's opening message for a fresh chat.
pub const GREETING: &str =
    "Hi! I'm your travel planner. Where would you like to go?";

/// The message history of one chat.
#[derive(Debug, Clone)]
pub struct Transcript {
    chat_id: String,
    messages: Vec<Message>,
    next_id: u64,
}

impl Transcript {
    /// Creates a transcript opening with the assistant greeting.
    pub fn new(chat_id: impl Into<String>) -> Self {
        let mut transcript = Self {
            chat_id: chat_id.into(),
            messages: Vec::new(),
            next_id: 1,
        };
        let id = transcript.allocate_id();
        transcript
            .messages
            .push(Message::new(id, MessageRole::Bot, GREETING));
        transcript
    }

    /// Creates an empty transcript with no greeting.
    pub fn empty(chat_id: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            messages: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        id.to_string()
    }

    /// Returns the chat id this transcript belongs to.
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Points the transcript at a different chat id.
    pub fn set_chat_id(&mut self, chat_id: impl Into<String>) {
        self.chat_id = chat_id.into();
    }

    /// Returns the messages in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the transcript holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the id of the currently streaming message, if any.
    pub fn streaming_id(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.is_streaming)
            .map(|m| m.id.as_str())
    }

    /// Appends a completed user message and returns its id.
    pub fn push_user(&mut self, content: impl Into<String>) -> String {
        let id = self.allocate_id();
        self.messages
            .push(Message::new(id.clone(), MessageRole::User, content));
        id
    }

    /// Opens an empty streaming bot placeholder and returns its id.
    ///
    /// Fails with [`Error::Validation`] if another message is still
    /// streaming; a transcript carries at most one open placeholder.
    pub fn open_placeholder(&mut self) -> Result<String> {
        if let Some(open) = self.streaming_id() {
            return Err(Error::validation(
                format!("message {open} is still streaming"),
                Some("placeholder".to_string()),
            ));
        }
        let id = self.allocate_id();
        self.messages.push(Message::placeholder(id.clone()));
        Ok(id)
    }

    fn streaming_message_mut(&mut self, id: &str) -> Result<&mut Message> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| Error::not_found(format!("no message with id {id}")))?;
        if !message.is_streaming {
            return Err(Error::validation(
                format!("message {id} is not streaming"),
                None,
            ));
        }
        Ok(message)
    }

    /// Appends a fragment to the streaming message.
    pub fn append(&mut self, id: &str, fragment: &str) -> Result<()> {
        self.streaming_message_mut(id)?.content.push_str(fragment);
        Ok(())
    }

    /// Closes the streaming message, leaving its accumulated content.
    pub fn complete(&mut self, id: &str) -> Result<()> {
        self.streaming_message_mut(id)?.is_streaming = false;
        Ok(())
    }

    /// Closes the streaming message with an error string as its content.
    pub fn fail(&mut self, id: &str, error_text: impl Into<String>) -> Result<()> {
        let message = self.streaming_message_mut(id)?;
        message.content = error_text.into();
        message.is_streaming = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transcript_opens_with_greeting() {
        let transcript = Transcript::new("chat-1");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.messages()[0].role, MessageRole::Bot);
        assert_eq!(transcript.messages()[0].content, GREETING);
        assert!(!transcript.messages()[0].is_streaming);
    }

    #[test]
    fn user_then_placeholder_then_appends() {
        let mut transcript = Transcript::empty("chat-1");
        transcript.push_user("Plan me a weekend in Lisbon");
        let id = transcript.open_placeholder().unwrap();
        transcript.append(&id, "Day 1:").unwrap();
        transcript.append(&id, " Alfama walk").unwrap();
        transcript.complete(&id).unwrap();

        let messages = transcript.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, "Day 1: Alfama walk");
        assert!(!messages[1].is_streaming);
        assert!(transcript.streaming_id().is_none());
    }

    #[test]
    fn second_placeholder_is_rejected() {
        let mut transcript = Transcript::empty("chat-1");
        let first = transcript.open_placeholder().unwrap();
        let err = transcript.open_placeholder().unwrap_err();
        assert!(err.is_validation());
        // The open placeholder is untouched by the failed attempt.
        assert_eq!(transcript.streaming_id(), Some(first.as_str()));
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn completed_message_is_immutable() {
        let mut transcript = Transcript::empty("chat-1");
        let id = transcript.open_placeholder().unwrap();
        transcript.append(&id, "done").unwrap();
        transcript.complete(&id).unwrap();

        assert!(transcript.append(&id, "more").is_err());
        assert!(transcript.complete(&id).is_err());
        assert_eq!(transcript.messages()[0].content, "done");
    }

    #[test]
    fn fail_replaces_content_and_closes() {
        let mut transcript = Transcript::empty("chat-1");
        let id = transcript.open_placeholder().unwrap();
        transcript.append(&id, "partial").unwrap();
        transcript.fail(&id, "Sorry, something went wrong.").unwrap();

        let message = &transcript.messages()[0];
        assert_eq!(message.content, "Sorry, something went wrong.");
        assert!(!message.is_streaming);
        assert!(transcript.fail(&id, "again").is_err());
    }

    #[test]
    fn append_to_unknown_id_is_not_found() {
        let mut transcript = Transcript::empty("chat-1");
        let err = transcript.append("999", "x").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn message_ids_are_unique() {
        let mut transcript = Transcript::new("chat-1");
        let a = transcript.push_user("one");
        let b = transcript.open_placeholder().unwrap();
        assert_ne!(a, b);
        assert_ne!(a, transcript.messages()[0].id);
    }
}
