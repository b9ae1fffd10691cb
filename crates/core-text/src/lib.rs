//! Line-oriented text buffer and cursor position model.
//!
//! Lines are stored as `Vec<char>` so a cursor column is a code point index
//! with O(1) access. A `Buffer` never holds zero lines: removing the final
//! line leaves a single empty line behind.
//!
//! Navigation lives in [`motion`], mutation primitives in [`edit`] (as
//! inherent `Buffer` methods) and display-row geometry in [`wrap`]. None of
//! these know about editor modes; callers pass `overshoot` where a motion may
//! land one past the last character (insert contexts).

pub mod edit;
pub mod motion;
pub mod wrap;

/// A cursor location inside a buffer.
///
/// `row` indexes the logical line, `col` is the code point index within it and
/// `row_offset` names the wrapped display sub-row that `col` falls on. The
/// sub-row is derived state; [`Buffer::sync_row_offset`] recomputes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Position {
    pub row: usize,
    pub row_offset: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            row_offset: 0,
            col,
        }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    /// Lexicographic ordering key. `row_offset` is derived and ignored.
    pub fn key(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn is_before(&self, other: &Position) -> bool {
        self.key() < other.key()
    }
}

/// Text storage: an ordered, never-empty list of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<Vec<char>>,
    /// Display width used for wrapping; 0 disables wrapping.
    wrap_width: usize,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
            wrap_width: 0,
        }
    }

    /// Build a buffer from plain text. A single trailing newline is treated as
    /// the file terminator rather than an extra empty line; `\r\n` endings are
    /// normalized to `\n`.
    pub fn from_text(text: &str) -> Self {
        let body = text.strip_suffix('\n').unwrap_or(text);
        let lines: Vec<Vec<char>> = body
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).chars().collect())
            .collect();
        Self {
            lines,
            wrap_width: 0,
        }
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines: Vec<Vec<char>> = lines
            .into_iter()
            .map(|l| l.as_ref().chars().collect())
            .collect();
        if lines.is_empty() {
            lines.push(Vec::new());
        }
        Self {
            lines,
            wrap_width: 0,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, row: usize) -> Option<&[char]> {
        self.lines.get(row).map(Vec::as_slice)
    }

    /// Code point length of `row`; 0 for rows past the end.
    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, Vec::len)
    }

    pub fn line_string(&self, row: usize) -> String {
        self.lines
            .get(row)
            .map(|l| l.iter().collect())
            .unwrap_or_default()
    }

    pub fn lines(&self) -> impl Iterator<Item = &[char]> {
        self.lines.iter().map(Vec::as_slice)
    }

    /// Full content joined with `\n` (no trailing terminator).
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.extend(line.iter());
        }
        out
    }

    /// Replace the whole content, keeping the wrap width. Exact inverse of
    /// [`Buffer::text`]: every `\n` separates two lines.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(|l| l.chars().collect()).collect();
    }

    pub fn wrap_width(&self) -> usize {
        self.wrap_width
    }

    pub fn set_wrap_width(&mut self, width: usize) {
        self.wrap_width = width;
    }

    /// Number of display rows `row` occupies at the current wrap width.
    pub fn display_rows(&self, row: usize) -> usize {
        self.line(row)
            .map_or(1, |l| wrap::row_starts(l, self.wrap_width).len())
    }

    /// Recompute `pos.row_offset` from `pos.col`.
    pub fn sync_row_offset(&self, pos: &mut Position) {
        pos.row_offset = self
            .line(pos.row)
            .map_or(0, |l| wrap::sub_row_of(l, pos.col, self.wrap_width));
    }

    pub(crate) fn line_mut(&mut self, row: usize) -> Option<&mut Vec<char>> {
        self.lines.get_mut(row)
    }

    pub(crate) fn lines_mut(&mut self) -> &mut Vec<Vec<char>> {
        &mut self.lines
    }

    /// Restore the at-least-one-line invariant after bulk removal.
    pub(crate) fn ensure_line(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(Vec::new());
        }
    }
}
