//! Visual selection: an anchor plus the live cursor.
//!
//! Direction is derived from the two endpoints on demand and never stored.
//! Block mode shares the characterwise geometry.

use core_text::{Buffer, Position, motion};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum SelectionMode {
    #[default]
    None,
    Visual,
    VisualLine,
    VisualBlock,
}

/// One row of a selection split for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowSplit {
    pub before: String,
    pub selected: String,
    pub after: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    mode: SelectionMode,
    anchor: Position,
}

impl Selection {
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn anchor(&self) -> Position {
        self.anchor
    }

    pub fn is_active(&self) -> bool {
        self.mode != SelectionMode::None
    }

    pub fn is_linewise(&self) -> bool {
        self.mode == SelectionMode::VisualLine
    }

    /// Start a fresh selection anchored at `anchor`, replacing any previous one.
    pub fn start(&mut self, mode: SelectionMode, anchor: Position) {
        self.clear();
        self.mode = mode;
        self.anchor = anchor;
        trace!(target: "state.selection", ?mode, row = anchor.row, col = anchor.col, "selection_start");
    }

    /// Switch between visual variants keeping the anchor.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    pub fn clear(&mut self) {
        self.mode = SelectionMode::None;
        self.anchor = Position::origin();
    }

    /// Normalized `(min, max)` of anchor and cursor, compared by (row, col).
    pub fn range(&self, cursor: Position) -> Option<(Position, Position)> {
        if !self.is_active() {
            return None;
        }
        if cursor.is_before(&self.anchor) {
            Some((cursor, self.anchor))
        } else {
            Some((self.anchor, cursor))
        }
    }

    /// True when the cursor sits on a later row than the anchor.
    pub fn cursor_after_anchor(&self, cursor: Position) -> bool {
        cursor.row > self.anchor.row
    }

    /// Selected text. Linewise selections yield every covered line followed
    /// by `\n`; characterwise ones yield exactly what [`Selection::delete`]
    /// would remove.
    pub fn selection_str(&self, buf: &Buffer, cursor: Position) -> String {
        let Some((min, max)) = self.range(cursor) else {
            return String::new();
        };
        if self.is_linewise() {
            let last = max.row.min(buf.line_count() - 1);
            let mut out = String::new();
            for row in min.row..=last {
                out.push_str(&buf.line_string(row));
                out.push('\n');
            }
            return out;
        }
        buf.text_in_range(min, max, self.cursor_after_anchor(cursor))
    }

    /// Split `row` into before/selected/after text, or `None` when the row
    /// is not part of the selection.
    pub fn row_split(&self, buf: &Buffer, cursor: Position, row: usize) -> Option<RowSplit> {
        let (min, max) = self.range(cursor)?;
        let line = buf.line(row)?;
        let (lo, hi) = if self.is_linewise() {
            if row < min.row || row > max.row {
                return None;
            }
            (0, line.len())
        } else {
            buf.range_span_on_row(row, min, max, self.cursor_after_anchor(cursor))?
        };
        Some(RowSplit {
            before: line[..lo].iter().collect(),
            selected: line[lo..hi].iter().collect(),
            after: line[hi..].iter().collect(),
        })
    }

    /// Delete the selected text, returning it. The cursor lands on the
    /// selection start, clamped for normal mode.
    pub fn delete(&self, buf: &mut Buffer, cursor: &mut Position) -> String {
        let Some((min, max)) = self.range(*cursor) else {
            return String::new();
        };
        let removed = if self.is_linewise() {
            let mut text = buf.delete_lines(min.row, max.row, cursor).join("\n");
            text.push('\n');
            text
        } else {
            let after = self.cursor_after_anchor(*cursor);
            buf.delete_runes_in_range(min, max, after, cursor)
        };
        motion::clamp(buf, cursor, false);
        removed
    }

    /// Exchange anchor and cursor (`o` in visual modes).
    pub fn swap_ends(&mut self, buf: &Buffer, cursor: &mut Position) {
        if !self.is_active() {
            return;
        }
        std::mem::swap(&mut self.anchor, cursor);
        buf.sync_row_offset(cursor);
    }

    /// Number of logical lines touched by the selection; 0 when inactive.
    pub fn selected_line_count(&self, cursor: Position) -> usize {
        self.range(cursor).map_or(0, |(min, max)| max.row - min.row + 1)
    }
}
