//! Minimal full-frame renderer.
//!
//! [`layout`] turns editor state into a [`Frame`] of styled spans without
//! touching the terminal, so the screen contents are unit-testable. [`draw`]
//! then writes a frame with crossterm commands.

use anyhow::Result;
use core_actions::{Editor, StatusKind, StatusMessage};
use core_state::Mode;
use core_text::{Buffer, Position, wrap};
use crossterm::{
    cursor::{MoveTo, SetCursorStyle, Show},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub reverse: bool,
    pub underline: bool,
    pub dim: bool,
    pub bold: bool,
}

impl Style {
    const DIM: Style = Style {
        reverse: false,
        underline: false,
        dim: true,
        bold: false,
    };
    const REVERSE: Style = Style {
        reverse: true,
        underline: false,
        dim: false,
        bold: false,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    Block,
    Bar,
    Underline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// One entry per text row; the status bar and the message line follow.
    pub rows: Vec<Vec<Span>>,
    pub status: Span,
    pub bottom: Span,
    pub cursor: (u16, u16),
    pub cursor_shape: CursorShape,
}

/// Scroll position carried between frames.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct View {
    top_row: usize,
    top_sub: usize,
    left: usize,
}

/// Width of the line-number gutter (digits plus one space), or 0 when hidden.
pub fn gutter_width(buf: &Buffer, line_numbers: bool) -> usize {
    if !line_numbers {
        return 0;
    }
    buf.line_count().to_string().len().max(3) + 1
}

fn cursor_sub(buf: &Buffer, cursor: Position) -> usize {
    buf.line(cursor.row)
        .map_or(0, |l| wrap::sub_row_of(l, cursor.col, buf.wrap_width()))
}

/// Display rows from `from` down to `to`, both given as (row, sub-row).
fn rows_between(buf: &Buffer, from: (usize, usize), to: (usize, usize)) -> usize {
    if from.0 == to.0 {
        return to.1.saturating_sub(from.1);
    }
    let mut n = buf.display_rows(from.0).saturating_sub(from.1);
    for row in from.0 + 1..to.0 {
        n += buf.display_rows(row);
    }
    n + to.1
}

impl View {
    /// Scroll so the cursor lies inside a text area of `height` rows.
    pub fn follow(&mut self, buf: &Buffer, cursor: Position, height: usize, text_width: usize) {
        let last = buf.line_count() - 1;
        self.top_row = self.top_row.min(last);
        self.top_sub = self.top_sub.min(buf.display_rows(self.top_row) - 1);
        let at = (cursor.row, cursor_sub(buf, cursor));
        if at < (self.top_row, self.top_sub) {
            (self.top_row, self.top_sub) = at;
        } else if height > 0 && rows_between(buf, (self.top_row, self.top_sub), at) >= height {
            let (mut row, mut sub) = at;
            for _ in 1..height {
                if sub > 0 {
                    sub -= 1;
                } else if row > 0 {
                    row -= 1;
                    sub = buf.display_rows(row) - 1;
                } else {
                    break;
                }
            }
            (self.top_row, self.top_sub) = (row, sub);
        }
        if buf.wrap_width() > 0 || text_width == 0 {
            self.left = 0;
        } else if cursor.col < self.left {
            self.left = cursor.col;
        } else if cursor.col >= self.left + text_width {
            self.left = cursor.col + 1 - text_width;
        }
    }
}

fn push_char(spans: &mut Vec<Span>, c: char, style: Style) {
    match spans.last_mut() {
        Some(last) if last.style == style => last.text.push(c),
        _ => spans.push(Span::new(c.to_string(), style)),
    }
}

fn message_span(message: Option<&StatusMessage>) -> Span {
    let Some(message) = message else {
        return Span::new("", Style::default());
    };
    let style = Style {
        bold: message.kind == StatusKind::Error,
        ..Style::default()
    };
    let indent = " ".repeat(usize::from(message.column));
    Span::new(format!("{indent}{}", message.text), style)
}

fn status_span(editor: &Editor, width: usize) -> Span {
    let state = editor.state();
    let doc = &state.document;
    let name = doc
        .path()
        .map_or_else(|| "[No Name]".to_string(), |p| p.display().to_string());
    let modified = if doc.is_dirty() { " [+]" } else { "" };
    let left = format!(" {} | {name}{modified}", state.mode.label());
    let mut right = String::new();
    if !editor.pending_keys().is_empty() {
        right.push_str(editor.pending_keys());
        right.push_str("  ");
    }
    if state.mode.is_visual() {
        right.push_str(&format!("{} lines  ", state.selected_line_count()));
    }
    let cursor = state.cursor();
    right.push_str(&format!("{}:{} ", cursor.row + 1, cursor.col + 1));
    let used = left.chars().count() + right.chars().count();
    let text = if used < width {
        format!("{left}{}{right}", " ".repeat(width - used))
    } else {
        left.chars().chain(right.chars()).take(width).collect()
    };
    Span::new(text, Style::REVERSE)
}

/// Lay out one frame for a `width` x `height` terminal.
pub fn layout(
    editor: &Editor,
    view: &mut View,
    width: u16,
    height: u16,
    message: Option<&StatusMessage>,
) -> Frame {
    let state = editor.state();
    let doc = &state.document;
    let buf = &doc.buffer;
    let cursor = doc.cursor;
    let width = usize::from(width);
    let text_rows = usize::from(height).saturating_sub(2);
    let gutter = gutter_width(buf, state.settings.line_numbers);
    let text_width = width.saturating_sub(gutter);
    view.follow(buf, cursor, text_rows, text_width);

    let cursor_at = (cursor.row, cursor_sub(buf, cursor));
    let mut screen_cursor = (gutter as u16, 0u16);
    let mut rows = Vec::with_capacity(text_rows);
    let (mut row, mut sub) = (view.top_row, view.top_sub);
    for screen_row in 0..text_rows {
        let Some(line) = buf.line(row) else {
            rows.push(vec![Span::new("~", Style::DIM)]);
            continue;
        };
        let starts = wrap::row_starts(line, buf.wrap_width());
        let (start, end) = if buf.wrap_width() > 0 {
            let end = starts.get(sub + 1).copied().unwrap_or(line.len());
            (starts[sub], end)
        } else {
            let start = view.left.min(line.len());
            (start, (view.left + text_width).min(line.len()))
        };
        let mut spans = Vec::new();
        if gutter > 0 {
            let number = if sub == 0 {
                format!("{:>w$} ", row + 1, w = gutter - 1)
            } else {
                " ".repeat(gutter)
            };
            spans.push(Span::new(number, Style::DIM));
        }
        let selected = if state.mode.is_visual() {
            state.selection.row_split(buf, cursor, row).map(|split| {
                let lo = split.before.chars().count();
                (lo, lo + split.selected.chars().count())
            })
        } else {
            None
        };
        for (col, &c) in line.iter().enumerate().take(end).skip(start) {
            let style = Style {
                reverse: selected.is_some_and(|(lo, hi)| col >= lo && col < hi),
                underline: doc.search.is_match_at(row, col),
                ..Style::default()
            };
            push_char(&mut spans, c, style);
        }
        if line.is_empty() && selected.is_some() {
            spans.push(Span::new(" ", Style::REVERSE));
        }
        if (row, sub) == cursor_at {
            let x: usize = line[start..cursor.col.clamp(start, line.len())]
                .iter()
                .map(|&c| wrap::char_width(c))
                .sum::<usize>()
                + cursor.col.saturating_sub(line.len());
            screen_cursor = ((gutter + x).min(width.saturating_sub(1)) as u16, screen_row as u16);
        }
        rows.push(spans);
        if sub + 1 < starts.len() && buf.wrap_width() > 0 {
            sub += 1;
        } else {
            row += 1;
            sub = 0;
        }
    }

    let bottom_row = usize::from(height).saturating_sub(1) as u16;
    let prompt = editor.prompt();
    let (bottom, cursor) = match state.mode {
        Mode::Command | Mode::SearchPrompt => {
            let text = format!("{}{}", prompt.prefix(), prompt.text());
            (Span::new(text, Style::default()), ((prompt.cursor() + 1) as u16, bottom_row))
        }
        _ => (message_span(message), screen_cursor),
    };
    let cursor_shape = match state.mode {
        Mode::Insert | Mode::Command | Mode::SearchPrompt => CursorShape::Bar,
        Mode::Replace => CursorShape::Underline,
        _ => CursorShape::Block,
    };
    Frame {
        rows,
        status: status_span(editor, width),
        bottom,
        cursor,
        cursor_shape,
    }
}

fn queue_span(out: &mut impl Write, span: &Span) -> Result<()> {
    let s = span.style;
    if s.reverse {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    if s.underline {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    if s.dim {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    if s.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    queue!(out, Print(&span.text))?;
    if s != Style::default() {
        queue!(out, SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

/// Write `frame` to the terminal.
pub fn draw(out: &mut impl Write, frame: &Frame) -> Result<()> {
    let mut y = 0u16;
    for row in &frame.rows {
        queue!(out, MoveTo(0, y), Clear(ClearType::CurrentLine))?;
        for span in row {
            queue_span(out, span)?;
        }
        y += 1;
    }
    queue!(out, MoveTo(0, y), Clear(ClearType::CurrentLine))?;
    queue_span(out, &frame.status)?;
    queue!(out, MoveTo(0, y + 1), Clear(ClearType::CurrentLine))?;
    queue_span(out, &frame.bottom)?;
    let shape = match frame.cursor_shape {
        CursorShape::Block => SetCursorStyle::SteadyBlock,
        CursorShape::Bar => SetCursorStyle::SteadyBar,
        CursorShape::Underline => SetCursorStyle::SteadyUnderScore,
    };
    queue!(out, shape, MoveTo(frame.cursor.0, frame.cursor.1), Show)?;
    out.flush()?;
    tracing::trace!(target: "render", rows = frame.rows.len(), "frame_drawn");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::KeyEvent;
    use core_state::{Document, MemoryClipboard, Settings};
    use pretty_assertions::assert_eq;

    struct NoFiles;

    impl core_state::DocumentProvider for NoFiles {
        fn load(
            &mut self,
            path: &std::path::Path,
        ) -> Result<core_state::LoadedDocument, core_state::DocumentError> {
            Err(core_state::DocumentError::Load {
                path: path.to_path_buf(),
                source: std::io::ErrorKind::NotFound.into(),
            })
        }

        fn save(
            &mut self,
            _path: &std::path::Path,
            content: &str,
        ) -> Result<core_state::SaveReport, core_state::DocumentError> {
            Ok(core_state::SaveReport {
                bytes: content.len(),
                lines: content.lines().count(),
            })
        }
    }

    fn editor(text: &str, settings: Settings, width: usize) -> Editor {
        let mut ed = Editor::new(settings, Box::new(MemoryClipboard::new()), Box::new(NoFiles));
        ed.state_mut()
            .replace_document(Document::new(Buffer::from_text(text)));
        ed.set_text_width(width);
        ed
    }

    fn plain_text(spans: &[Span]) -> String {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    fn no_numbers() -> Settings {
        Settings {
            line_numbers: false,
            ..Settings::default()
        }
    }

    #[test]
    fn wraps_long_lines_and_numbers_first_sub_row() {
        let mut ed = editor("abcdefgh\nxy", Settings::default(), 4);
        ed.handle_key(&KeyEvent::char('$'));
        let frame = layout(&ed, &mut View::default(), 8, 6, None);
        let rows: Vec<String> = frame.rows.iter().map(|r| plain_text(r)).collect();
        assert_eq!(rows, vec!["  1 abcd", "    efgh", "  2 xy", "~"]);
        assert_eq!(frame.cursor, (7, 1));
    }

    #[test]
    fn selection_is_reversed() {
        let mut ed = editor("hello", no_numbers(), 20);
        for c in ['l', 'v', 'l'] {
            ed.handle_key(&KeyEvent::char(c));
        }
        let frame = layout(&ed, &mut View::default(), 40, 3, None);
        assert_eq!(
            frame.rows[0],
            vec![
                Span::new("h", Style::default()),
                Span::new("el", Style::REVERSE),
                Span::new("lo", Style::default()),
            ]
        );
        assert!(frame.status.text.contains("VISUAL"));
        assert!(frame.status.text.contains("1 lines"));
    }

    #[test]
    fn search_matches_are_underlined() {
        let mut ed = editor("ab ab", no_numbers(), 20);
        for c in ['/', 'a', 'b'] {
            ed.handle_key(&KeyEvent::char(c));
        }
        let frame = layout(&ed, &mut View::default(), 20, 3, None);
        let underlined: Vec<&str> = frame.rows[0]
            .iter()
            .filter(|s| s.style.underline)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(underlined, vec!["ab", "ab"]);
        assert_eq!(frame.bottom.text, "/ab");
        assert_eq!(frame.cursor, (3, 2));
        assert_eq!(frame.cursor_shape, CursorShape::Bar);
    }

    #[test]
    fn view_scrolls_to_keep_cursor_visible() {
        let text = (1..=10).map(|n| n.to_string()).collect::<Vec<_>>().join("\n");
        let mut ed = editor(&text, no_numbers(), 10);
        ed.handle_key(&KeyEvent::char('G'));
        let mut view = View::default();
        let frame = layout(&ed, &mut view, 10, 5, None);
        let rows: Vec<String> = frame.rows.iter().map(|r| plain_text(r)).collect();
        assert_eq!(rows, vec!["8", "9", "10"]);
        assert_eq!(frame.cursor, (0, 2));
        ed.handle_key(&KeyEvent::char('g'));
        ed.handle_key(&KeyEvent::char('g'));
        let frame = layout(&ed, &mut view, 10, 5, None);
        assert_eq!(plain_text(&frame.rows[0]), "1");
    }

    #[test]
    fn status_shows_mode_position_and_message() {
        let mut ed = editor("abc", no_numbers(), 30);
        ed.handle_key(&KeyEvent::char('l'));
        let message = StatusMessage::new("saved", StatusKind::Info);
        let frame = layout(&ed, &mut View::default(), 30, 4, Some(&message));
        assert!(frame.status.text.starts_with(" NORMAL | [No Name]"));
        assert!(frame.status.text.ends_with("1:2 "));
        assert_eq!(frame.status.text.chars().count(), 30);
        assert_eq!(frame.bottom.text, "saved");
    }

    #[test]
    fn unwrapped_lines_scroll_horizontally() {
        let mut settings = no_numbers();
        settings.wrap = false;
        let mut ed = editor("abcdefghij", settings, 4);
        ed.handle_key(&KeyEvent::char('$'));
        let frame = layout(&ed, &mut View::default(), 4, 3, None);
        assert_eq!(plain_text(&frame.rows[0]), "ghij");
        assert_eq!(frame.cursor, (3, 0));
    }

    #[test]
    fn draw_emits_text() {
        let ed = editor("abc", no_numbers(), 10);
        let frame = layout(&ed, &mut View::default(), 10, 3, None);
        let mut out = Vec::new();
        draw(&mut out, &frame).unwrap();
        let written = String::from_utf8_lossy(&out);
        assert!(written.contains("abc"));
        assert!(written.contains("NORMAL"));
    }
}
