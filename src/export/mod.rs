//! Export engine: deliver classified key subsets to the clipboard.
//!
//! Copy attempts are two-staged: the system clipboard first, then the
//! platform copy command. A successful export raises a time-bounded
//! "copied" acknowledgment that rendering layers can observe through a
//! watch channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::checker::CheckerConfig;

mod clipboard;

pub use clipboard::{ClipboardSink, CommandClipboard, MockClipboard, SystemClipboard};

/// Result of one export call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    /// The text reached the clipboard through either transport
    Copied,
    /// The text was empty; nothing was written and no acknowledgment fires
    Skipped,
    /// Both transports failed; the caller should prompt for a manual copy
    Failed { reason: String },
}

/// Copies export payloads to the clipboard with a degraded fallback.
///
/// Concurrent export calls are legal; each successful call manages its own
/// acknowledgment expiry, and a later export is never clobbered by an
/// earlier call's timer.
pub struct ExportEngine {
    primary: Box<dyn ClipboardSink>,
    fallback: Box<dyn ClipboardSink>,
    ack_window: Duration,
    /// Bumped by every successful export; expiry tasks only lower the flag
    /// if no newer export has raised it since.
    ack_epoch: Arc<AtomicU64>,
    copied_tx: watch::Sender<bool>,
}

impl ExportEngine {
    /// Engine over the real system clipboard with the platform fallback.
    pub fn system() -> Self {
        Self::new(
            Box::new(SystemClipboard),
            Box::new(CommandClipboard::platform_default()),
        )
    }

    /// Engine over explicit primary and fallback sinks.
    pub fn new(primary: Box<dyn ClipboardSink>, fallback: Box<dyn ClipboardSink>) -> Self {
        let (copied_tx, _) = watch::channel(false);
        Self {
            primary,
            fallback,
            ack_window: Duration::from_millis(CheckerConfig::default().ack_window_ms),
            ack_epoch: Arc::new(AtomicU64::new(0)),
            copied_tx,
        }
    }

    /// Override the acknowledgment window (2 seconds by default).
    pub fn with_ack_window(mut self, window: Duration) -> Self {
        self.ack_window = window;
        self
    }

    /// Subscribe to the "copied" acknowledgment flag.
    pub fn copied(&self) -> watch::Receiver<bool> {
        self.copied_tx.subscribe()
    }

    /// True while a recent successful export's acknowledgment is showing.
    pub fn is_copied(&self) -> bool {
        *self.copied_tx.borrow()
    }

    /// Write `text` to the clipboard, falling back to the platform copy
    /// command when the system clipboard is unavailable.
    ///
    /// Empty text is skipped outright: no write, no acknowledgment, no
    /// error. On success through either transport the acknowledgment flag
    /// raises for the configured window and then reverts on its own. When
    /// both transports fail the caller gets `Failed` and should present a
    /// manual-copy prompt; the failure is not fatal.
    pub async fn export(&self, text: &str) -> ExportStatus {
        if text.is_empty() {
            return ExportStatus::Skipped;
        }

        match self.primary.write_text(text) {
            Ok(()) => {
                tracing::debug!(len = text.len(), "Exported via system clipboard");
                self.raise_ack();
                ExportStatus::Copied
            }
            Err(primary_err) => {
                tracing::warn!(
                    error = %primary_err,
                    "System clipboard failed, trying copy command"
                );
                match self.fallback.write_text(text) {
                    Ok(()) => {
                        tracing::debug!(len = text.len(), "Exported via copy command");
                        self.raise_ack();
                        ExportStatus::Copied
                    }
                    Err(fallback_err) => {
                        tracing::error!(
                            primary_error = %primary_err,
                            fallback_error = %fallback_err,
                            "Both clipboard transports failed"
                        );
                        ExportStatus::Failed {
                            reason: fallback_err.to_string(),
                        }
                    }
                }
            }
        }
    }

    /// Raise the acknowledgment flag and schedule its expiry.
    fn raise_ack(&self) {
        let epoch = self.ack_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.copied_tx.send_replace(true);

        let ack_epoch = self.ack_epoch.clone();
        let copied_tx = self.copied_tx.clone();
        let window = self.ack_window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            // A newer export owns the flag now; leave it up for its window
            if ack_epoch.load(Ordering::SeqCst) == epoch {
                copied_tx.send_replace(false);
            }
        });
    }
}
