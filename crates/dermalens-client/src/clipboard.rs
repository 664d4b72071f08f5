//! Host clipboard seam.
//!
//! The controller formats report text but the surrounding shell owns the
//! actual clipboard (browser API, desktop toolkit, test buffer), so writes
//! go through this trait.

use thiserror::Error;

/// Errors a clipboard backend can report.
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// No clipboard exists in this host.
    #[error("Clipboard unavailable")]
    Unavailable,

    /// The host clipboard rejected the write.
    #[error("Clipboard write failed: {0}")]
    Write(String),
}

/// Host-provided clipboard.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard for headless hosts: every write fails as unavailable, which
/// [`Controller::copy_report`](crate::Controller::copy_report) swallows
/// without surfacing anything to the user.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullClipboard;

impl Clipboard for NullClipboard {
    fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}
