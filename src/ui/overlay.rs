//! Scoped ownership of the drag preview overlay
//!
//! The preview is the only OS-visible resource a drag acquires. It is shown on
//! the first preview request and hidden when the guard is released, consumed
//! or dropped, whichever comes first. No exit path can leave it on screen.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::domain::core::Rect;
use crate::platform::FeedbackSink;

/// Message drawn inside the preview until its deadline passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    text: String,
    until: Instant,
}

impl TransientMessage {
    pub fn new(text: &str, duration: Duration, now: Instant) -> Self {
        Self {
            text: text.to_string(),
            until: now + duration,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.until
    }

    /// The text while the message is still live
    pub fn text_at(&self, now: Instant) -> Option<&str> {
        (!self.is_expired(now)).then_some(self.text.as_str())
    }
}

/// RAII wrapper around a [`FeedbackSink`]
///
/// Pairs every `show_preview` with exactly one `hide_preview`.
pub struct PreviewOverlay<F: FeedbackSink> {
    /// Always `Some` until `into_inner` moves the sink out
    sink: Option<F>,
    visible: bool,
}

impl<F: FeedbackSink> PreviewOverlay<F> {
    pub fn new(sink: F) -> Self {
        Self {
            sink: Some(sink),
            visible: false,
        }
    }

    /// Shows the preview at `rect`, or moves it there if already visible
    pub fn present(&mut self, rect: Rect) {
        if let Some(sink) = self.sink.as_mut() {
            if self.visible {
                sink.update_preview(rect);
            } else {
                trace!(%rect, "acquiring preview overlay");
                sink.show_preview(rect);
                self.visible = true;
            }
        }
    }

    /// Requests a transient message alongside the preview
    pub fn message(&mut self, text: &str, duration: Duration) {
        if let Some(sink) = self.sink.as_mut() {
            sink.show_transient_message(text, duration);
        }
    }

    /// Lets the sink expire time-based feedback
    pub fn refresh(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.refresh();
        }
    }

    /// Hides the preview if it is showing; safe to call repeatedly
    pub fn release(&mut self) {
        if !self.visible {
            return;
        }
        if let Some(sink) = self.sink.as_mut() {
            trace!("releasing preview overlay");
            sink.hide_preview();
        }
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Releases the preview and hands the sink back
    pub fn into_inner(mut self) -> F {
        self.release();
        match self.sink.take() {
            Some(sink) => sink,
            None => unreachable!("preview sink is only taken by into_inner"),
        }
    }
}

impl<F: FeedbackSink> Drop for PreviewOverlay<F> {
    fn drop(&mut self) {
        self.release();
    }
}
