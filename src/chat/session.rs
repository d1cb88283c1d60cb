//! Core chat session management.
//!
//! [`ChatSession`] drives one conversation: it owns the transcript,
//! sends messages through the client, and folds the streamed reply
//! back into the transcript while rendering it incrementally. Sends
//! are single-flight; a second send while one is in progress is
//! rejected rather than queued.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;

use crate::client::Wayfarer;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::markdown::MarkdownGate;
use crate::render::Renderer;
use crate::transcript::Transcript;
use crate::types::ChatRequest;

/// Fallback content for a reply that failed mid-stream.
const ERROR_PLACEHOLDER: &str = "Sorry, I ran into a problem with that request.";

/// A chat session against the travel-planning service.
pub struct ChatSession {
    client: Arc<Wayfarer>,
    transcript: Transcript,
    in_flight: bool,
    cancel: CancellationToken,
    total_sends: u64,
    total_frames: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The chat id currently in use.
    pub chat_id: String,
    /// The number of messages in the transcript.
    pub message_count: usize,
    /// Whether a usable access token is held.
    pub authenticated: bool,
    /// Messages sent to the assistant.
    pub total_sends: u64,
    /// Stream frames received across all sends.
    pub total_frames: u64,
}

impl ChatSession {
    /// Creates a session with a fresh chat id and the greeting message.
    pub fn new(client: Arc<Wayfarer>) -> Self {
        Self::with_chat_id(client, fresh_chat_id())
    }

    /// Creates a session resuming the given chat id.
    pub fn with_chat_id(client: Arc<Wayfarer>, chat_id: impl Into<String>) -> Self {
        Self {
            client,
            transcript: Transcript::new(chat_id),
            in_flight: false,
            cancel: CancellationToken::new(),
            total_sends: 0,
            total_frames: 0,
        }
    }

    /// Returns the transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the client backing this session.
    pub fn client(&self) -> &Arc<Wayfarer> {
        &self.client
    }

    /// Returns true while a send is in progress.
    pub fn is_sending(&self) -> bool {
        self.in_flight
    }

    /// Returns a handle that cancels the in-flight send when triggered.
    ///
    /// Cancellation is cooperative and silent: the reply keeps whatever
    /// content had streamed before the cancel.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Sends a user message and streams the reply into the transcript.
    ///
    /// The user message lands in the transcript before any network
    /// activity, then an empty bot placeholder opens and accumulates
    /// fragments as they arrive. On success the placeholder completes;
    /// on abort it completes with partial content and no error; on any
    /// other failure its content becomes an error string.
    pub async fn send_message(&mut self, text: &str, renderer: &mut dyn Renderer) -> Result<()> {
        if self.in_flight {
            return Err(Error::validation(
                "a message is already being sent",
                Some("content".to_string()),
            ));
        }

        self.transcript.push_user(text);
        let placeholder = self.transcript.open_placeholder()?;
        self.in_flight = true;
        self.cancel = CancellationToken::new();
        self.total_sends += 1;

        let request = ChatRequest::new(self.transcript.chat_id(), text);
        let outcome = match self.client.stream_chat(request).await {
            Ok(stream) => self.consume_stream(&placeholder, stream, renderer).await,
            Err(err) => Err(err),
        };
        self.in_flight = false;

        match outcome {
            Ok(()) => {
                self.transcript.complete(&placeholder)?;
                let content = self.content_of(&placeholder);
                renderer.finish_message(&content);
                Ok(())
            }
            Err(err) if err.is_abort() => {
                // Cancellation keeps partial content and stays silent.
                self.transcript.complete(&placeholder)?;
                renderer.print_interrupted();
                Ok(())
            }
            Err(err) => {
                self.transcript
                    .fail(&placeholder, format!("{ERROR_PLACEHOLDER} ({err})"))?;
                renderer.print_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Folds a frame stream into the placeholder message.
    ///
    /// Fragments append to the transcript immediately; rendering goes
    /// through the markdown gate so the terminal never shows a
    /// truncated code fence. Malformed frames are counted and skipped;
    /// stream close (or `[DONE]`) ends the reply.
    async fn consume_stream<S>(
        &mut self,
        placeholder: &str,
        mut stream: S,
        renderer: &mut dyn Renderer,
    ) -> Result<()>
    where
        S: Stream<Item = Result<Frame>> + Unpin,
    {
        renderer.start_message();
        let mut gate = MarkdownGate::new();
        let cancel = self.cancel.clone();

        loop {
            if renderer.should_interrupt() {
                return Err(Error::abort("stream interrupted"));
            }
            let frame = tokio::select! {
                _ = cancel.cancelled() => return Err(Error::abort("send cancelled")),
                frame = stream.next() => frame,
            };
            match frame {
                None => break,
                Some(Ok(Frame::Done)) => break,
                Some(Ok(Frame::Data(fragment))) => {
                    self.total_frames += 1;
                    self.transcript.append(placeholder, &fragment)?;
                    if let Some(safe) = gate.push(&fragment) {
                        renderer.print_text(&safe);
                    }
                }
                Some(Err(err)) if err.is_frame() => continue,
                Some(Err(err)) => return Err(err),
            }
        }

        let tail = gate.finish();
        if !tail.is_empty() {
            renderer.print_text(&tail);
        }
        Ok(())
    }

    fn content_of(&self, id: &str) -> String {
        self.transcript
            .messages()
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }

    /// Starts a fresh chat: cancels any in-flight send and resets the
    /// transcript to the greeting under a new chat id.
    pub fn new_chat(&mut self) {
        self.cancel.cancel();
        self.in_flight = false;
        self.transcript = Transcript::new(fresh_chat_id());
    }

    /// Switches to another chat id without touching the message list.
    pub fn select_chat(&mut self, chat_id: impl Into<String>) {
        self.transcript.set_chat_id(chat_id);
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            chat_id: self.transcript.chat_id().to_string(),
            message_count: self.transcript.len(),
            authenticated: self.client.session().is_authenticated(),
            total_sends: self.total_sends,
            total_frames: self.total_frames,
        }
    }
}

/// Mints a chat id from the current wall clock, in unix milliseconds.
fn fresh_chat_id() -> String {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).to_string()
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;
    use crate::session::SessionStore;
    use crate::transcript::GREETING;

    /// Renderer that records calls and can interrupt after N prints.
    #[derive(Default)]
    struct RecordingRenderer {
        printed: Vec<String>,
        finished: Vec<String>,
        errors: Vec<String>,
        interruptions: usize,
        interrupt_after: Option<usize>,
    }

    impl Renderer for RecordingRenderer {
        fn print_text(&mut self, text: &str) {
            self.printed.push(text.to_string());
        }

        fn finish_message(&mut self, content: &str) {
            self.finished.push(content.to_string());
        }

        fn print_error(&mut self, error: &str) {
            self.errors.push(error.to_string());
        }

        fn print_info(&mut self, _info: &str) {}

        fn print_interrupted(&mut self) {
            self.interruptions += 1;
        }

        fn should_interrupt(&self) -> bool {
            self.interrupt_after
                .is_some_and(|n| self.printed.len() >= n)
        }
    }

    fn test_session() -> ChatSession {
        let store = Arc::new(SessionStore::in_memory());
        let client = Wayfarer::with_options(
            store,
            Some("http://localhost:1/api/v1".to_string()),
            None,
            None,
        )
        .unwrap();
        ChatSession::new(Arc::new(client))
    }

    fn frames(parts: &[&str]) -> impl Stream<Item = Result<Frame>> + Unpin {
        let owned: Vec<_> = parts
            .iter()
            .map(|p| Ok(Frame::Data(p.to_string())))
            .collect();
        Box::pin(stream::iter(owned))
    }

    #[test]
    fn new_session_opens_with_greeting() {
        let session = test_session();
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript().messages()[0].content, GREETING);
        assert!(!session.is_sending());
    }

    #[tokio::test]
    async fn consume_stream_appends_and_renders() {
        let mut session = test_session();
        let placeholder = session.transcript.open_placeholder().unwrap();
        let mut renderer = RecordingRenderer::default();

        session
            .consume_stream(&placeholder, frames(&["Hello", "!"]), &mut renderer)
            .await
            .unwrap();

        let content = session.content_of(&placeholder);
        assert_eq!(content, "Hello!");
        // No markdown boundary occurs, so output arrives as one flush.
        assert_eq!(renderer.printed.concat(), "Hello!");
    }

    #[tokio::test]
    async fn done_sentinel_ends_the_reply() {
        let mut session = test_session();
        let placeholder = session.transcript.open_placeholder().unwrap();
        let mut renderer = RecordingRenderer::default();

        let items: Vec<Result<Frame>> = vec![
            Ok(Frame::Data("bye".to_string())),
            Ok(Frame::Done),
            Ok(Frame::Data("never seen".to_string())),
        ];
        session
            .consume_stream(&placeholder, Box::pin(stream::iter(items)), &mut renderer)
            .await
            .unwrap();

        assert_eq!(session.content_of(&placeholder), "bye");
    }

    #[tokio::test]
    async fn malformed_frames_are_skipped() {
        let mut session = test_session();
        let placeholder = session.transcript.open_placeholder().unwrap();
        let mut renderer = RecordingRenderer::default();

        let items: Vec<Result<Frame>> = vec![
            Ok(Frame::Data("a".to_string())),
            Err(Error::frame("expected 'data: ' prefix", "noise")),
            Ok(Frame::Data("b".to_string())),
        ];
        session
            .consume_stream(&placeholder, Box::pin(stream::iter(items)), &mut renderer)
            .await
            .unwrap();

        assert_eq!(session.content_of(&placeholder), "ab");
    }

    #[tokio::test]
    async fn stream_errors_propagate() {
        let mut session = test_session();
        let placeholder = session.transcript.open_placeholder().unwrap();
        let mut renderer = RecordingRenderer::default();

        let items: Vec<Result<Frame>> = vec![
            Ok(Frame::Data("partial".to_string())),
            Err(Error::streaming("connection reset", None)),
        ];
        let err = session
            .consume_stream(&placeholder, Box::pin(stream::iter(items)), &mut renderer)
            .await
            .unwrap_err();

        assert!(err.is_streaming());
        assert_eq!(session.content_of(&placeholder), "partial");
    }

    #[tokio::test]
    async fn interrupt_aborts_with_partial_content() {
        let mut session = test_session();
        let placeholder = session.transcript.open_placeholder().unwrap();
        let mut renderer = RecordingRenderer {
            interrupt_after: Some(1),
            ..RecordingRenderer::default()
        };

        let err = session
            .consume_stream(
                &placeholder,
                frames(&["Day 1: Arrive\n\n", "Day 2: Explore"]),
                &mut renderer,
            )
            .await
            .unwrap_err();

        assert!(err.is_abort());
        // The first fragment landed before the interrupt was observed.
        assert_eq!(session.content_of(&placeholder), "Day 1: Arrive\n\n");
    }

    #[tokio::test]
    async fn cancelled_token_aborts_before_reading() {
        let mut session = test_session();
        let placeholder = session.transcript.open_placeholder().unwrap();
        let mut renderer = RecordingRenderer::default();

        session.cancel_handle().cancel();
        let err = session
            .consume_stream(&placeholder, frames(&["unreached"]), &mut renderer)
            .await
            .unwrap_err();

        assert!(err.is_abort());
        assert_eq!(session.content_of(&placeholder), "");
    }

    #[tokio::test]
    async fn second_send_is_rejected_while_in_flight() {
        let mut session = test_session();
        session.in_flight = true;
        let mut renderer = RecordingRenderer::default();

        let before = session.transcript().len();
        let err = session
            .send_message("second message", &mut renderer)
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(session.transcript().len(), before);
    }

    #[test]
    fn new_chat_resets_transcript_and_cancels() {
        let mut session = test_session();
        session.transcript.push_user("hello");
        let handle = session.cancel_handle();

        session.new_chat();

        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript().messages()[0].content, GREETING);
        assert!(!session.transcript().chat_id().is_empty());
        assert!(handle.is_cancelled());
        assert!(!session.is_sending());
    }

    #[test]
    fn select_chat_swaps_id_only() {
        let mut session = test_session();
        session.transcript.push_user("keep me");
        session.select_chat("other-chat");
        assert_eq!(session.transcript().chat_id(), "other-chat");
        assert_eq!(session.transcript().len(), 2);
    }

    #[test]
    fn stats_snapshot() {
        let session = test_session();
        let stats = session.stats();
        assert_eq!(stats.message_count, 1);
        assert!(!stats.authenticated);
        assert_eq!(stats.total_sends, 0);
        assert_eq!(stats.total_frames, 0);
    }
}
