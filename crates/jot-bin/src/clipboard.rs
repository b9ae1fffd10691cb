//! Clipboard backend selection.
//!
//! With the `system-clipboard` feature yanks go to the OS clipboard through
//! `arboard`; when that is unavailable (no display server) the editor falls
//! back to a process-local clipboard.

use core_state::{Clipboard, MemoryClipboard};

#[cfg(feature = "system-clipboard")]
mod system {
    use core_state::{Clipboard, ClipboardError};

    pub struct SystemClipboard {
        inner: arboard::Clipboard,
    }

    impl SystemClipboard {
        pub fn new() -> Result<Self, ClipboardError> {
            arboard::Clipboard::new()
                .map(|inner| Self { inner })
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))
        }
    }

    impl Clipboard for SystemClipboard {
        fn read(&mut self) -> Result<String, ClipboardError> {
            match self.inner.get_text() {
                Ok(text) if text.is_empty() => Err(ClipboardError::Empty),
                Ok(text) => Ok(text),
                Err(arboard::Error::ContentNotAvailable) => Err(ClipboardError::Empty),
                Err(e) => Err(ClipboardError::Unavailable(e.to_string())),
            }
        }

        fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.inner
                .set_text(text.to_owned())
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))
        }
    }
}

#[cfg(feature = "system-clipboard")]
pub fn open_clipboard() -> Box<dyn Clipboard> {
    match system::SystemClipboard::new() {
        Ok(clipboard) => {
            tracing::info!(target: "runtime.clipboard", backend = "system", "clipboard_ready");
            Box::new(clipboard)
        }
        Err(err) => {
            tracing::warn!(target: "runtime.clipboard", %err, "system_clipboard_unavailable");
            Box::new(MemoryClipboard::new())
        }
    }
}

#[cfg(not(feature = "system-clipboard"))]
pub fn open_clipboard() -> Box<dyn Clipboard> {
    tracing::info!(target: "runtime.clipboard", backend = "memory", "clipboard_ready");
    Box::new(MemoryClipboard::new())
}
