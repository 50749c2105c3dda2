//! Clipboard transports.
//!
//! Two sinks back the export engine: the system clipboard via arboard, and
//! a degraded path that pipes through the platform copy utility for
//! environments where the clipboard API is missing or permission-gated.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::Context;

use crate::error::Result;

/// A destination that can receive exported text.
///
/// Implementations perform a single write attempt; retry and fallback
/// policy live in the export engine, not here.
pub trait ClipboardSink: Send + Sync {
    /// Write `text` to the sink, replacing any previous contents.
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Primary sink backed by the system clipboard.
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text.to_owned())?;
        Ok(())
    }
}

/// Degraded sink that pipes the text into the platform copy command.
///
/// The desktop analogue of the legacy select-and-copy path: when the
/// clipboard API is unavailable, the text goes to the stdin of `pbcopy`,
/// `clip`, `wl-copy`, or `xclip` depending on platform.
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    /// Sink for the current platform's copy utility.
    pub fn platform_default() -> Self {
        #[cfg(target_os = "macos")]
        {
            Self::new("pbcopy", &[])
        }
        #[cfg(target_os = "windows")]
        {
            Self::new("clip", &[])
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            if std::env::var_os("WAYLAND_DISPLAY").is_some() {
                Self::new("wl-copy", &[])
            } else {
                Self::new("xclip", &["-selection", "clipboard"])
            }
        }
    }
}

impl ClipboardSink for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.program))?;

        {
            let mut stdin = child
                .stdin
                .take()
                .with_context(|| format!("no stdin handle for {}", self.program))?;
            stdin
                .write_all(text.as_bytes())
                .with_context(|| format!("failed to write to {}", self.program))?;
        }

        let status = child
            .wait()
            .with_context(|| format!("failed to wait for {}", self.program))?;
        if !status.success() {
            return Err(anyhow::anyhow!("{} exited with {}", self.program, status).into());
        }
        Ok(())
    }
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

use parking_lot::Mutex;
use std::sync::Arc;

/// Recording sink for tests.
///
/// Stores every write so assertions can check what reached the clipboard,
/// and can be configured to fail to exercise the fallback path.
#[derive(Clone, Default)]
pub struct MockClipboard {
    writes: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockClipboard {
    /// A sink that accepts every write.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that rejects every write.
    pub fn failing() -> Self {
        Self {
            writes: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// All text written so far, in order.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }
}

impl ClipboardSink for MockClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow::anyhow!("mock clipboard rejected the write").into());
        }
        self.writes.lock().push(text.to_string());
        Ok(())
    }
}
