//! Output rendering for streamed chat replies.
//!
//! The [`Renderer`] trait is the seam between the transcript controller
//! and whatever draws the conversation. While a reply streams, text
//! arrives through `print_text` in markdown-safe slices; once the reply
//! completes, `finish_message` hands over the full content so richer
//! frontends can re-render it as formatted markdown. The plain-text
//! implementation here just keeps the terminal tidy.

use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// ANSI escape code for dim text (used for status lines).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// Trait for rendering streaming chat output.
pub trait Renderer: Send {
    /// Called when a bot reply begins streaming.
    fn start_message(&mut self) {}

    /// Print a markdown-safe slice of the streaming reply.
    fn print_text(&mut self, text: &str);

    /// Called when a reply completes, with its full content.
    ///
    /// Frontends that render markdown re-draw the message here; the
    /// plain-text renderer only settles the cursor onto a fresh line.
    fn finish_message(&mut self, content: &str) {
        _ = content;
    }

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Called when a streaming reply is interrupted by the user.
    fn print_interrupted(&mut self) {}

    /// Returns true if streaming should be interrupted.
    fn should_interrupt(&self) -> bool {
        false
    }
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    line_start: bool,
    interrupted: Option<Arc<AtomicBool>>,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with the given color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            line_start: true,
            interrupted: None,
        }
    }

    /// Attaches an interrupt flag to the renderer.
    pub fn with_interrupt(mut self, interrupted: Arc<AtomicBool>) -> Self {
        self.interrupted = Some(interrupted);
        self
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn write(&mut self, text: &str) {
        print!("{text}");
        if let Some(last) = text.chars().last() {
            self.line_start = last == '\n';
        }
        self.flush();
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_text(&mut self, text: &str) {
        self.write(text);
    }

    fn finish_message(&mut self, _content: &str) {
        if !self.line_start {
            self.write("\n");
        }
    }

    fn print_error(&mut self, error: &str) {
        if !self.line_start {
            println!();
        }
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
        self.line_start = true;
    }

    fn print_info(&mut self, info: &str) {
        if !self.line_start {
            println!();
        }
        if self.use_color {
            println!("{ANSI_DIM}{info}{ANSI_RESET}");
        } else {
            println!("{info}");
        }
        self.line_start = true;
        self.flush();
    }

    fn print_interrupted(&mut self) {
        if !self.line_start {
            println!();
        }
        println!("[interrupted]");
        self.line_start = true;
        self.flush();
    }

    fn should_interrupt(&self) -> bool {
        self.interrupted
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn interrupt_flag_is_observed() {
        let flag = Arc::new(AtomicBool::new(false));
        let renderer = PlainTextRenderer::with_color(false).with_interrupt(flag.clone());
        assert!(!renderer.should_interrupt());
        flag.store(true, Ordering::Relaxed);
        assert!(renderer.should_interrupt());
    }
}
