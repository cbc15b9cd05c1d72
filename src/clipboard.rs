//! Clipboard sink and the "copied" marker reset timer.
//!
//! Copying is a UI side effect: the text goes to a `ClipboardSink`, and the
//! session shows a copied marker that clears itself after a short delay. A
//! newer copy cancels the previous reset.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

pub const COPY_RESET_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("no message at index {0}")]
    NoSuchMessage(usize),
    #[error("message {0} is not an assistant reply")]
    NotAssistant(usize),
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Destination for copied message text.
pub trait ClipboardSink: Send + Sync {
    /// Place `text` on the clipboard.
    ///
    /// # Errors
    ///
    /// Returns [`ClipboardError::Unavailable`] when the platform clipboard
    /// cannot be opened or written.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Platform clipboard backed by `arboard`. A handle is opened per write so
/// the sink stays `Send + Sync` on every platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        clipboard
            .set_text(text.to_owned())
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

/// A single cancellable delayed task. Scheduling replaces (and aborts) the
/// previous one; dropping the timer aborts whatever is outstanding.
#[derive(Debug, Default)]
pub struct ResetTimer {
    handle: Option<JoinHandle<()>>,
}

impl ResetTimer {
    /// Run `task` after `delay` on the current tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for ResetTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "clipboard_test.rs"]
mod clipboard_test;
