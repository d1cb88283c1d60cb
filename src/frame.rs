//! Wire codec for the chat stream.
//!
//! The service answers `POST /chats/` with a stream of lines shaped
//! `data: <fragment>\n`, where the fragment has literal newlines escaped
//! as the two characters `\` + `n`. Blank lines separate frames. Stream
//! close is the authoritative terminator; a `data: [DONE]` sentinel may
//! appear but is not guaranteed.
//!
//! Frames are decoded into an explicit [`Frame`] type, and lines that are
//! not valid frames surface as [`Error::Frame`] instead of being silently
//! ignored.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::error::{Error, Result};
use crate::observability;

/// The framing prefix for data lines.
const DATA_PREFIX: &str = "data: ";

/// The optional end-of-stream sentinel.
const DONE_SENTINEL: &str = "[DONE]";

/// A decoded frame from the chat stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// A text fragment, with escaped newlines decoded.
    Data(String),
    /// The optional `[DONE]` sentinel.
    Done,
}

impl Frame {
    /// Returns true if this frame is the end-of-stream sentinel.
    pub fn is_done(&self) -> bool {
        matches!(self, Frame::Done)
    }
}

/// Decodes the escaped-newline convention used by the chat stream.
pub fn unescape_newlines(fragment: &str) -> String {
    fragment.replace("\\n", "\n")
}

/// Process a stream of bytes into a stream of chat frames.
///
/// Buffers raw bytes across chunk boundaries, so a frame (or a
/// multi-byte character inside one) may be split anywhere by the
/// transport. Complete lines are decoded as UTF-8 individually; blank
/// separator lines are skipped, and a trailing unterminated line is
/// decoded when the stream closes.
pub fn decode_frames<S>(byte_stream: S) -> impl Stream<Item = Result<Frame>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    let buffer: Vec<u8> = Vec::new();

    stream::unfold(
        (stream, buffer),
        move |(mut stream, mut buffer)| async move {
            loop {
                // Drain complete lines already buffered
                while let Some(newline) = buffer.iter().position(|&b| b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=newline).collect();
                    if let Some(item) = decode_frame_line(&line[..line.len() - 1]) {
                        return Some((item, (stream, buffer)));
                    }
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => buffer.extend_from_slice(&bytes),
                    Some(Err(e)) => {
                        return Some((Err(e), (stream, buffer)));
                    }
                    None => {
                        // End of stream: a trailing unterminated line still counts
                        if !buffer.is_empty() {
                            let line = std::mem::take(&mut buffer);
                            if let Some(item) = decode_frame_line(&line) {
                                return Some((item, (stream, buffer)));
                            }
                        }
                        return None;
                    }
                }
            }
        },
    )
}

/// Decodes one complete line's bytes as UTF-8 and parses it as a frame.
fn decode_frame_line(line: &[u8]) -> Option<Result<Frame>> {
    match std::str::from_utf8(line) {
        Ok(text) => parse_frame_line(text),
        Err(e) => Some(Err(Error::encoding(
            format!("Invalid UTF-8 in stream: {e}"),
            Some(Box::new(e)),
        ))),
    }
}

/// Parses a single line from the stream.
///
/// Returns `None` for blank separator lines, which carry no frame.
fn parse_frame_line(line: &str) -> Option<Result<Frame>> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.is_empty() {
        return None;
    }
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        observability::STREAM_FRAME_ERRORS.click();
        return Some(Err(Error::frame("expected 'data: ' prefix", line)));
    };
    observability::STREAM_FRAMES.click();
    if payload == DONE_SENTINEL {
        return Some(Ok(Frame::Done));
    }
    Some(Ok(Frame::Data(unescape_newlines(payload))))
}
