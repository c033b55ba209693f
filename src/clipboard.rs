// Clipboard sink - best-effort text copy to the system clipboard
//
// Uses `arboard` for cross-platform support (Windows, macOS, Linux).
// The clipboard is created fresh each time to avoid holding resources.

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Best-effort clipboard write. Failure is reported, never retried.
pub trait ClipboardSink {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// The real system clipboard
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    /// Common failure cases: no display server (headless Linux),
    /// permission denied.
    fn write_text(&self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;
        clipboard
            .set_text(text)
            .context("Failed to set clipboard text")?;
        Ok(())
    }
}
