//! Patch-based linear undo history.
//!
//! Each finalized entry stores a forward and a backward [`Patch`] plus the
//! cursors to restore, and the fingerprint of the content the edit started
//! from. Callers gate application on that fingerprint:
//!
//! * undo applies only when the stored fingerprint differs from the live one
//!   (the live content still reflects the edit);
//! * redo applies only when they match (the live content is back at the
//!   state the edit started from).
//!
//! A mismatch means "nothing to do", never an error.

use core_text::{Buffer, Position};
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;
use thiserror::Error;
use tracing::trace;

/// Default maximum number of entries retained per document.
pub const HISTORY_LIMIT_DEFAULT: usize = 200;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("patch does not apply: expected text at offset {offset} has changed")]
    Stale { offset: usize },
}

/// Single-hunk replacement expressed in char offsets: at `offset`, `removed`
/// is replaced by `inserted`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Patch {
    pub offset: usize,
    pub removed: String,
    pub inserted: String,
}

impl Patch {
    /// Smallest single hunk turning `before` into `after`, found by trimming
    /// the common prefix and suffix.
    pub fn diff(before: &str, after: &str) -> Patch {
        let a: Vec<char> = before.chars().collect();
        let b: Vec<char> = after.chars().collect();
        let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
        let suffix = a[prefix..]
            .iter()
            .rev()
            .zip(b[prefix..].iter().rev())
            .take_while(|(x, y)| x == y)
            .count();
        Patch {
            offset: prefix,
            removed: a[prefix..a.len() - suffix].iter().collect(),
            inserted: b[prefix..b.len() - suffix].iter().collect(),
        }
    }

    pub fn invert(&self) -> Patch {
        Patch {
            offset: self.offset,
            removed: self.inserted.clone(),
            inserted: self.removed.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.inserted.is_empty()
    }

    /// Apply to `text`, verifying the text being replaced is still there.
    pub fn apply(&self, text: &str) -> Result<String, PatchError> {
        let stale = PatchError::Stale {
            offset: self.offset,
        };
        let start = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .nth(self.offset)
            .ok_or_else(|| stale.clone())?;
        if !text[start..].starts_with(&self.removed) {
            return Err(stale);
        }
        let mut out = String::with_capacity(text.len() + self.inserted.len());
        out.push_str(&text[..start]);
        out.push_str(&self.inserted);
        out.push_str(&text[start + self.removed.len()..]);
        Ok(out)
    }
}

/// Digest of buffer text used to guard patch application.
pub fn fingerprint(text: &str) -> u64 {
    let mut h = DefaultHasher::new();
    h.write(text.as_bytes());
    h.finish()
}

pub fn buffer_fingerprint(buf: &Buffer) -> u64 {
    fingerprint(&buf.text())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub redo: Patch,
    pub undo: Patch,
    pub undo_cursor: Position,
    pub redo_cursor: Position,
    /// Fingerprint of the content before the edit.
    pub fingerprint: u64,
}

/// What an undo or redo hands back to the caller for guarded application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStep {
    pub patch: Patch,
    pub fingerprint: u64,
    pub cursor: Position,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    /// Index of the most recently applied entry; `None` before the first.
    index: Option<usize>,
    /// Undo cursor of the entry being recorded.
    pending: Option<Position>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT_DEFAULT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            pending: None,
            limit: limit.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.max(1);
        self.trim();
    }

    /// Open a pending entry, dropping every entry past the current index.
    pub fn new_entry(&mut self, cursor: Position) {
        let keep = self.index.map_or(0, |i| i + 1);
        if keep < self.entries.len() {
            trace!(target: "state.history", dropped = self.entries.len() - keep, "truncate_redo_tail");
            self.entries.truncate(keep);
        }
        self.pending = Some(cursor);
    }

    /// Finalize the pending entry. Returns false when none was open.
    pub fn update_entry(
        &mut self,
        redo: Patch,
        undo: Patch,
        redo_cursor: Position,
        fingerprint: u64,
    ) -> bool {
        let Some(undo_cursor) = self.pending.take() else {
            return false;
        };
        self.entries.push(HistoryEntry {
            redo,
            undo,
            undo_cursor,
            redo_cursor,
            fingerprint,
        });
        self.trim();
        self.index = Some(self.entries.len() - 1);
        trace!(target: "state.history", entries = self.entries.len(), "entry_finalized");
        true
    }

    /// Drop the pending entry without recording anything.
    pub fn discard_pending(&mut self) {
        if self.pending.take().is_some() {
            trace!(target: "state.history", "pending_discarded");
        }
    }

    fn trim(&mut self) {
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
            self.index = self.index.and_then(|i| i.checked_sub(excess));
            trace!(target: "state.history", excess, "history_trimmed");
        }
    }

    /// Step back over the current entry. `None` when nothing is left to undo.
    pub fn undo(&mut self) -> Option<HistoryStep> {
        let i = self.index?;
        let entry = &self.entries[i];
        let step = HistoryStep {
            patch: entry.undo.clone(),
            fingerprint: entry.fingerprint,
            cursor: entry.undo_cursor,
        };
        self.index = i.checked_sub(1);
        trace!(target: "state.history", from = i, "undo");
        Some(step)
    }

    /// Step forward to the next entry. `None` at the newest entry.
    pub fn redo(&mut self) -> Option<HistoryStep> {
        let next = self.index.map_or(0, |i| i + 1);
        let entry = self.entries.get(next)?;
        let step = HistoryStep {
            patch: entry.redo.clone(),
            fingerprint: entry.fingerprint,
            cursor: entry.redo_cursor,
        };
        self.index = Some(next);
        trace!(target: "state.history", to = next, "redo");
        Some(step)
    }
}
