//! Incremental markdown gating for streamed text.
//!
//! A markdown renderer fed partial text can mis-render badly: an unclosed
//! code fence swallows the rest of the reply, a split paragraph reflows.
//! The gate buffers incoming fragments and only releases prefixes that end
//! at a safe boundary, so a renderer never sees a truncated structural
//! element. Whatever remains is flushed unconditionally at stream end.

use std::pin::Pin;

use futures::Stream;

use crate::error::Error;

/// Returns the length of the largest prefix of `text` ending at a safe
/// boundary, or 0 when no safe boundary exists yet.
///
/// A boundary is safe when it falls (a) immediately after a closing code
/// fence followed by its newline, or (b) immediately after a blank-line
/// separator outside any open fence. Fences are tracked line by line, so
/// an opening fence is never released unclosed.
pub fn safe_boundary(text: &str) -> usize {
    let mut best = 0;
    let mut offset = 0;
    let mut in_fence = false;
    for line in text.split_inclusive('\n') {
        let terminated = line.ends_with('\n');
        if line.trim().starts_with("```") {
            in_fence = !in_fence;
            if !in_fence && terminated {
                // Closing fence plus its newline
                best = offset + line.len();
            }
        } else if !in_fence && terminated && line.trim_end_matches(['\r', '\n']).is_empty() {
            // Blank separator line: the prefix ends after the double newline
            best = offset + line.len();
        }
        offset += line.len();
    }
    best
}

/// Buffers streamed text and releases it only at safe boundaries.
#[derive(Debug, Default)]
pub struct MarkdownGate {
    buffer: String,
}

impl MarkdownGate {
    /// Creates an empty gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment and returns the safe prefix to flush, if any.
    ///
    /// The remainder stays buffered until a later fragment closes the
    /// structure or the stream ends.
    pub fn push(&mut self, fragment: &str) -> Option<String> {
        self.buffer.push_str(fragment);
        let safe = safe_boundary(&self.buffer);
        if safe > 0 {
            Some(self.buffer.drain(..safe).collect())
        } else {
            None
        }
    }

    /// Flushes whatever remains, unconditionally. Call at stream end.
    pub fn finish(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    /// Returns true if no text is waiting behind the gate.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// A stream wrapper that gates text fragments at safe markdown boundaries.
///
/// Yields flushed text as the inner stream produces fragments, and flushes
/// the remaining buffer when the inner stream finishes. Dropping the
/// stream mid-flight discards the buffer; cancellation never produces a
/// partial flush.
pub struct GatedStream {
    inner: Pin<Box<dyn Stream<Item = Result<String, Error>> + Send>>,
    gate: MarkdownGate,
    finished: bool,
}

impl GatedStream {
    /// Wraps a fragment stream in a markdown gate.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<String, Error>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
            gate: MarkdownGate::new(),
            finished: false,
        }
    }
}

impl Stream for GatedStream {
    type Item = Result<String, Error>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        use std::task::Poll;
        if self.finished {
            return Poll::Ready(None);
        }
        loop {
            match self.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(fragment))) => {
                    if let Some(flushed) = self.gate.push(&fragment) {
                        return Poll::Ready(Some(Ok(flushed)));
                    }
                    // Nothing safe to release yet; keep polling
                }
                Poll::Ready(Some(Err(e))) => return Poll::Ready(Some(Err(e))),
                Poll::Ready(None) => {
                    self.finished = true;
                    let remainder = self.gate.finish();
                    if remainder.is_empty() {
                        return Poll::Ready(None);
                    }
                    return Poll::Ready(Some(Ok(remainder)));
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
