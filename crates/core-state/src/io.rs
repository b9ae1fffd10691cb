//! Capabilities the editing core consumes from its host: document storage
//! and a clipboard. Implementations live in the binary (filesystem, OS
//! clipboard) and in tests.

use core_text::Position;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot open {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is read-only")]
    ReadOnly(PathBuf),
    #[error("no file name")]
    NoPath,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard is empty")]
    Empty,
}

/// Result of a successful load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadedDocument {
    pub content: String,
    /// Last known cursor for this document; clamped by the caller.
    pub cursor: Position,
    pub writable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub bytes: usize,
    pub lines: usize,
}

pub trait DocumentProvider {
    fn load(&mut self, path: &Path) -> Result<LoadedDocument, DocumentError>;
    fn save(&mut self, path: &Path, content: &str) -> Result<SaveReport, DocumentError>;
}

pub trait Clipboard {
    fn read(&mut self) -> Result<String, ClipboardError>;
    fn write(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Process-local clipboard.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn read(&mut self) -> Result<String, ClipboardError> {
        self.contents.clone().ok_or(ClipboardError::Empty)
    }

    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
