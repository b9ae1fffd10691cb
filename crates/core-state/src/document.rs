//! One open document: buffer, cursor, history and search state.
//!
//! Switching documents swaps a whole `Document` in and out; nothing here is
//! shared between documents.

use crate::history::{History, Patch, fingerprint};
use crate::io::{DocumentError, DocumentProvider, LoadedDocument, SaveReport};
use crate::search::SearchState;
use core_text::{Buffer, Position, motion};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

#[derive(Debug, Clone)]
pub struct Document {
    pub buffer: Buffer,
    pub cursor: Position,
    pub search: SearchState,
    history: History,
    path: Option<PathBuf>,
    writable: bool,
    dirty: bool,
    /// Content at the moment the open edit began.
    edit_base: Option<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Buffer::new())
    }
}

impl Document {
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: Position::origin(),
            search: SearchState::default(),
            history: History::default(),
            path: None,
            writable: true,
            dirty: false,
            edit_base: None,
        }
    }

    pub fn from_loaded(path: PathBuf, loaded: LoadedDocument) -> Self {
        let mut doc = Self::new(Buffer::from_text(&loaded.content));
        doc.cursor = loaded.cursor;
        motion::clamp(&doc.buffer, &mut doc.cursor, false);
        doc.path = Some(path);
        doc.writable = loaded.writable;
        doc
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn set_history_limit(&mut self, limit: usize) {
        self.history.set_limit(limit);
    }

    pub fn fingerprint(&self) -> u64 {
        fingerprint(&self.buffer.text())
    }

    /// Record that the buffer changed outside a begin/finish pair.
    pub fn content_changed(&mut self) {
        self.dirty = true;
        if self.search.is_active() {
            self.search.refresh(&self.buffer);
        }
    }

    pub fn is_editing(&self) -> bool {
        self.edit_base.is_some()
    }

    /// Open a pending history entry. A second call while one is open is ignored.
    pub fn begin_edit(&mut self) {
        if self.edit_base.is_some() {
            return;
        }
        self.edit_base = Some(self.buffer.text());
        self.history.new_entry(self.cursor);
    }

    /// Close the open edit. An entry is recorded only when the content
    /// changed; returns whether one was.
    pub fn finish_edit(&mut self) -> bool {
        let Some(before) = self.edit_base.take() else {
            return false;
        };
        let after = self.buffer.text();
        let before_fp = fingerprint(&before);
        if before_fp == fingerprint(&after) {
            self.history.discard_pending();
            return false;
        }
        let redo = Patch::diff(&before, &after);
        let undo = redo.invert();
        trace!(
            target: "state.history",
            offset = redo.offset,
            removed = redo.removed.chars().count(),
            inserted = redo.inserted.chars().count(),
            "edit_recorded"
        );
        self.history.update_entry(redo, undo, self.cursor, before_fp);
        self.content_changed();
        true
    }

    /// Run a discrete edit as one history entry. Inside an already open edit
    /// the closure just joins it. The closure reports whether it changed
    /// anything; the return value is that report.
    pub fn edit(&mut self, f: impl FnOnce(&mut Buffer, &mut Position) -> bool) -> bool {
        let joined = self.is_editing();
        self.begin_edit();
        let changed = f(&mut self.buffer, &mut self.cursor);
        if joined {
            if changed {
                self.content_changed();
            }
        } else {
            self.finish_edit();
        }
        changed
    }

    /// Undo the newest applied entry. Returns whether content changed.
    pub fn undo(&mut self) -> bool {
        let Some(step) = self.history.undo() else {
            return false;
        };
        if step.fingerprint == self.fingerprint() {
            debug!(target: "state.history", "undo_guard_unchanged");
            return false;
        }
        self.apply_step(&step.patch, step.cursor)
    }

    /// Redo the next entry. Returns whether content changed.
    pub fn redo(&mut self) -> bool {
        let Some(step) = self.history.redo() else {
            return false;
        };
        if step.fingerprint != self.fingerprint() {
            debug!(target: "state.history", "redo_guard_mismatch");
            return false;
        }
        self.apply_step(&step.patch, step.cursor)
    }

    fn apply_step(&mut self, patch: &Patch, cursor: Position) -> bool {
        match patch.apply(&self.buffer.text()) {
            Ok(text) => {
                self.buffer.set_text(&text);
                self.cursor = cursor;
                motion::clamp(&self.buffer, &mut self.cursor, false);
                self.content_changed();
                true
            }
            Err(err) => {
                debug!(target: "state.history", %err, "patch_skipped");
                false
            }
        }
    }

    /// Persist through `provider`. The buffer is untouched on failure.
    pub fn save(&mut self, provider: &mut dyn DocumentProvider) -> Result<SaveReport, DocumentError> {
        let path = self.path.clone().ok_or(DocumentError::NoPath)?;
        if !self.writable {
            return Err(DocumentError::ReadOnly(path));
        }
        let mut content = self.buffer.text();
        content.push('\n');
        let report = provider.save(&path, &content)?;
        self.dirty = false;
        info!(target: "io", bytes = report.bytes, lines = report.lines, "document_saved");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::DocumentError;

    #[derive(Default)]
    struct Sink {
        saved: Option<String>,
        fail: bool,
    }

    impl DocumentProvider for Sink {
        fn load(&mut self, path: &Path) -> Result<LoadedDocument, DocumentError> {
            Err(DocumentError::Load {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }

        fn save(&mut self, path: &Path, content: &str) -> Result<SaveReport, DocumentError> {
            if self.fail {
                return Err(DocumentError::Save {
                    path: path.to_path_buf(),
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                });
            }
            self.saved = Some(content.to_string());
            Ok(SaveReport {
                bytes: content.len(),
                lines: content.lines().count(),
            })
        }
    }

    #[test]
    fn unchanged_edit_records_nothing() {
        let mut doc = Document::new(Buffer::from_text("ab"));
        doc.begin_edit();
        assert!(!doc.finish_edit());
        assert!(doc.history().is_empty());
        assert!(!doc.is_dirty());
    }

    #[test]
    fn undo_then_redo_restores_content_and_cursor() {
        let mut doc = Document::new(Buffer::from_text("ab"));
        doc.edit(|buf, cur| {
            buf.insert_char(cur, 'X');
            true
        });
        let after_cursor = doc.cursor;
        assert_eq!(doc.buffer.text(), "Xab");
        assert!(doc.undo());
        assert_eq!(doc.buffer.text(), "ab");
        assert_eq!(doc.cursor, Position::origin());
        assert!(doc.redo());
        assert_eq!(doc.buffer.text(), "Xab");
        assert_eq!(doc.cursor, after_cursor);
        assert!(!doc.redo());
    }

    #[test]
    fn redo_is_skipped_when_content_moved_on() {
        let mut doc = Document::new(Buffer::from_text("ab"));
        doc.edit(|buf, cur| {
            buf.insert_char(cur, 'X');
            true
        });
        assert!(doc.undo());
        doc.buffer.set_text("zz");
        assert!(!doc.redo());
        assert_eq!(doc.buffer.text(), "zz");
    }

    #[test]
    fn nested_edit_joins_open_entry() {
        let mut doc = Document::new(Buffer::from_text(""));
        doc.begin_edit();
        doc.edit(|buf, cur| {
            buf.insert_char(cur, 'a');
            true
        });
        doc.edit(|buf, cur| {
            buf.insert_char(cur, 'b');
            true
        });
        assert!(doc.finish_edit());
        assert_eq!(doc.history().len(), 1);
        assert!(doc.undo());
        assert_eq!(doc.buffer.text(), "");
    }

    #[test]
    fn failed_save_keeps_buffer_and_dirty_flag() {
        let mut doc = Document::new(Buffer::from_text("a"));
        doc.edit(|buf, cur| {
            buf.insert_char(cur, 'b');
            true
        });
        let mut sink = Sink {
            fail: true,
            ..Sink::default()
        };
        assert!(matches!(doc.save(&mut sink), Err(DocumentError::NoPath)));
        doc.set_path(PathBuf::from("note.md"));
        assert!(matches!(doc.save(&mut sink), Err(DocumentError::Save { .. })));
        assert!(doc.is_dirty());
        assert_eq!(doc.buffer.text(), "ba");
        sink.fail = false;
        let report = doc.save(&mut sink).unwrap();
        assert_eq!(report.lines, 1);
        assert_eq!(sink.saved.as_deref(), Some("ba\n"));
        assert!(!doc.is_dirty());
    }

    #[test]
    fn read_only_documents_refuse_to_save() {
        let loaded = LoadedDocument {
            content: "x\n".into(),
            cursor: Position::new(9, 9),
            writable: false,
        };
        let mut doc = Document::from_loaded(PathBuf::from("ro.md"), loaded);
        assert_eq!(doc.cursor, Position::new(0, 0));
        assert!(matches!(
            doc.save(&mut Sink::default()),
            Err(DocumentError::ReadOnly(_))
        ));
    }
}
