//! Mutation primitives.
//!
//! Each primitive keeps the at-least-one-line invariant and leaves the cursor
//! where the next edit expects it. Column clamping for normal-mode contexts is
//! the caller's job unless noted.

use crate::motion::col_limit;
use crate::{Buffer, Position};
use tracing::trace;

/// Half-open `[lo, hi)` span for the inclusive column range `[lo, hi]` on a line of `len`.
fn inclusive_span(len: usize, lo: usize, hi: usize) -> (usize, usize) {
    let hi = (hi + 1).min(len);
    (lo.min(hi), hi)
}

/// Column where the first row's removed tail begins in a multi-row range.
///
/// The tail starts one column after `col` unless the active cursor sits on a
/// later row than the anchor, in which case `col` itself is included.
fn first_tail_start(len: usize, col: usize, cursor_after_anchor: bool) -> usize {
    let start = if cursor_after_anchor { col } else { col + 1 };
    start.min(len)
}

impl Buffer {
    /// Insert `c` at the cursor and advance past it.
    pub fn insert_char(&mut self, pos: &mut Position, c: char) {
        if let Some(line) = self.line_mut(pos.row) {
            let col = pos.col.min(line.len());
            line.insert(col, c);
            pos.col = col + 1;
        }
        self.sync_row_offset(pos);
    }

    /// Split the line at the cursor; the cursor moves to the start of the new line.
    pub fn insert_newline(&mut self, pos: &mut Position) {
        let Some(line) = self.line_mut(pos.row) else {
            return;
        };
        let col = pos.col.min(line.len());
        let tail = line.split_off(col);
        self.lines_mut().insert(pos.row + 1, tail);
        pos.row += 1;
        pos.col = 0;
        pos.row_offset = 0;
    }

    /// Delete the character before the cursor. At column 0 the line is joined
    /// onto the previous one.
    pub fn backspace(&mut self, pos: &mut Position) -> bool {
        if pos.col > 0 {
            let Some(line) = self.line_mut(pos.row) else {
                return false;
            };
            let col = pos.col.min(line.len());
            if col == 0 {
                return false;
            }
            line.remove(col - 1);
            pos.col = col - 1;
        } else if pos.row > 0 && pos.row < self.line_count() {
            let removed = self.lines_mut().remove(pos.row);
            pos.row -= 1;
            let prev = &mut self.lines_mut()[pos.row];
            pos.col = prev.len();
            prev.extend(removed);
        } else {
            return false;
        }
        self.sync_row_offset(pos);
        true
    }

    /// Delete the character under the cursor, keeping the cursor on a character.
    pub fn delete_under(&mut self, pos: &mut Position) -> Option<char> {
        let line = self.line_mut(pos.row)?;
        if pos.col >= line.len() {
            return None;
        }
        let removed = line.remove(pos.col);
        pos.col = pos.col.min(col_limit(line.len(), false));
        self.sync_row_offset(pos);
        Some(removed)
    }

    /// Overwrite the character under the cursor. No-op on an empty line.
    pub fn replace_char(&mut self, pos: &Position, c: char) -> bool {
        match self.line_mut(pos.row) {
            Some(line) if pos.col < line.len() => {
                line[pos.col] = c;
                true
            }
            _ => false,
        }
    }

    /// Text covered by `[min, max]` (inclusive), exactly as
    /// [`Buffer::delete_runes_in_range`] with the same arguments removes it.
    pub fn text_in_range(&self, min: Position, max: Position, cursor_after_anchor: bool) -> String {
        let mut out = String::new();
        if min.row >= self.line_count() {
            return out;
        }
        let max_row = max.row.min(self.line_count() - 1);
        let first = self.line(min.row).unwrap_or_default();
        if min.row == max_row {
            let (lo, hi) = inclusive_span(first.len(), min.col, max.col);
            out.extend(&first[lo..hi]);
            return out;
        }
        let start = first_tail_start(first.len(), min.col, cursor_after_anchor);
        out.extend(&first[start..]);
        for row in min.row + 1..max_row {
            out.push('\n');
            out.extend(self.line(row).unwrap_or_default());
        }
        out.push('\n');
        let last = self.line(max_row).unwrap_or_default();
        let hi = (max.col + 1).min(last.len());
        out.extend(&last[..hi]);
        out
    }

    /// Half-open column span of `row` covered by `[min, max]` under the same
    /// rules as [`Buffer::text_in_range`]; `None` when `row` lies outside.
    pub fn range_span_on_row(
        &self,
        row: usize,
        min: Position,
        max: Position,
        cursor_after_anchor: bool,
    ) -> Option<(usize, usize)> {
        if row < min.row || row > max.row || row >= self.line_count() {
            return None;
        }
        let len = self.line_len(row);
        let span = if min.row == max.row {
            inclusive_span(len, min.col, max.col)
        } else if row == min.row {
            (first_tail_start(len, min.col, cursor_after_anchor), len)
        } else if row == max.row {
            (0, (max.col + 1).min(len))
        } else {
            (0, len)
        };
        Some(span)
    }

    /// Remove the inclusive range `[min, max]` and return the removed text.
    ///
    /// On one row this drains `[min.col, max.col]`. Across rows the first
    /// row's tail is trimmed (see `first_tail_start`), every row strictly
    /// between is dropped, the last row's head through `max.col` is trimmed and
    /// the two remnants are merged. The cursor lands on `min`.
    pub fn delete_runes_in_range(
        &mut self,
        min: Position,
        max: Position,
        cursor_after_anchor: bool,
        cursor: &mut Position,
    ) -> String {
        if min.row >= self.line_count() {
            return String::new();
        }
        let removed = self.text_in_range(min, max, cursor_after_anchor);
        let max_row = max.row.min(self.line_count() - 1);
        if min.row == max_row {
            if let Some(line) = self.line_mut(min.row) {
                let (lo, hi) = inclusive_span(line.len(), min.col, max.col);
                line.drain(lo..hi);
            }
        } else {
            let last_tail: Vec<char> = self
                .line(max_row)
                .map(|l| l[(max.col + 1).min(l.len())..].to_vec())
                .unwrap_or_default();
            let lines = self.lines_mut();
            let first = &mut lines[min.row];
            let start = first_tail_start(first.len(), min.col, cursor_after_anchor);
            first.truncate(start);
            first.extend(last_tail);
            lines.drain(min.row + 1..=max_row);
        }
        cursor.row = min.row;
        cursor.col = min.col.min(self.line_len(min.row));
        self.sync_row_offset(cursor);
        trace!(
            target: "text.edit",
            from_row = min.row,
            to_row = max_row,
            removed_chars = removed.chars().count(),
            "delete_runes_in_range"
        );
        removed
    }

    /// Remove rows `first..=last` and return them. Removing every row leaves
    /// one empty line. The cursor moves to column 0 of the row now at `first`.
    pub fn delete_lines(&mut self, first: usize, last: usize, pos: &mut Position) -> Vec<String> {
        if first >= self.line_count() {
            return Vec::new();
        }
        let last = last.min(self.line_count() - 1);
        let removed: Vec<String> = self
            .lines_mut()
            .drain(first..=last)
            .map(|l| l.into_iter().collect())
            .collect();
        self.ensure_line();
        pos.row = first.min(self.line_count() - 1);
        pos.col = 0;
        self.sync_row_offset(pos);
        trace!(target: "text.edit", first, last, "delete_lines");
        removed
    }

    /// Open an empty line below the cursor and move onto it.
    pub fn empty_line_below(&mut self, pos: &mut Position) {
        let at = (pos.row + 1).min(self.line_count());
        self.lines_mut().insert(at, Vec::new());
        pos.row = at;
        pos.col = 0;
        pos.row_offset = 0;
    }

    /// Open an empty line above the cursor and move onto it.
    pub fn empty_line_above(&mut self, pos: &mut Position) {
        let at = pos.row.min(self.line_count());
        self.lines_mut().insert(at, Vec::new());
        pos.row = at;
        pos.col = 0;
        pos.row_offset = 0;
    }

    /// Join the next line onto the current one with a single space separator
    /// (leading whitespace of the joined line is dropped). The cursor lands on
    /// the join point.
    pub fn merge_line_below(&mut self, pos: &mut Position) -> bool {
        if pos.row + 1 >= self.line_count() {
            return false;
        }
        let lines = self.lines_mut();
        let next: Vec<char> = lines
            .remove(pos.row + 1)
            .into_iter()
            .skip_while(|c| c.is_whitespace())
            .collect();
        let current = &mut lines[pos.row];
        let join = current.len();
        if !current.is_empty() && !next.is_empty() {
            current.push(' ');
        }
        current.extend(next);
        pos.col = join.min(col_limit(current.len(), false));
        self.sync_row_offset(pos);
        true
    }

    /// Insert `text` (which may span lines) at the cursor. The cursor ends
    /// just past the last inserted character.
    pub fn insert_text(&mut self, pos: &mut Position, text: &str) {
        let Some(line) = self.line_mut(pos.row) else {
            return;
        };
        let col = pos.col.min(line.len());
        let tail = line.split_off(col);
        let mut parts = text.split('\n');
        line.extend(parts.next().unwrap_or_default().chars());
        let mut end_col = line.len();
        let mut row = pos.row;
        for part in parts {
            row += 1;
            let new_line: Vec<char> = part.chars().collect();
            end_col = new_line.len();
            self.lines_mut().insert(row, new_line);
        }
        if let Some(last) = self.line_mut(row) {
            last.extend(tail);
        }
        pos.row = row;
        pos.col = end_col;
        self.sync_row_offset(pos);
    }

    /// Insert whole lines below the cursor row; the cursor moves to the first of them.
    pub fn insert_lines_below(&mut self, pos: &mut Position, lines: &[String]) {
        let at = (pos.row + 1).min(self.line_count());
        self.insert_lines_at(at, pos, lines);
    }

    /// Insert whole lines above the cursor row; the cursor moves to the first of them.
    pub fn insert_lines_above(&mut self, pos: &mut Position, lines: &[String]) {
        let at = pos.row.min(self.line_count());
        self.insert_lines_at(at, pos, lines);
    }

    fn insert_lines_at(&mut self, at: usize, pos: &mut Position, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        self.lines_mut()
            .splice(at..at, lines.iter().map(|l| l.chars().collect::<Vec<char>>()));
        pos.row = at;
        pos.col = 0;
        self.sync_row_offset(pos);
    }
}
