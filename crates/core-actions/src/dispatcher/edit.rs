//! Text mutation: insert-mode typing, normal-mode single-key edits, line
//! yank and paste.
//!
//! Every buffer change runs inside `Document::edit`, so a normal-mode edit is
//! one history entry and an insert-mode edit joins the entry opened when
//! Insert was entered.

use super::{DispatchResult, Services};
use crate::EditKind;
use core_state::{ClipboardError, Document, EditorState, Mode};
use core_text::{Buffer, Position, motion};

pub(crate) fn handle_edit(
    kind: EditKind,
    state: &mut EditorState,
    services: &mut Services<'_>,
) -> DispatchResult {
    let insert = state.mode == Mode::Insert;
    let tab_width = state.settings.tab_width;
    let doc = &mut state.document;
    let changed = match kind {
        EditKind::InsertChar(c) => edit(doc, insert, |buf, cur| {
            buf.insert_char(cur, c);
            true
        }),
        EditKind::InsertNewline => edit(doc, insert, |buf, cur| {
            buf.insert_newline(cur);
            true
        }),
        EditKind::InsertTab => edit(doc, insert, |buf, cur| {
            for _ in 0..tab_width {
                buf.insert_char(cur, ' ');
            }
            tab_width > 0
        }),
        EditKind::Backspace => edit(doc, insert, |buf, cur| buf.backspace(cur)),
        EditKind::DeleteForward => edit(doc, insert, |buf, cur| {
            if cur.col < buf.line_len(cur.row) {
                let mut at = *cur;
                let removed = buf.delete_under(&mut at).is_some();
                buf.sync_row_offset(cur);
                removed
            } else {
                false
            }
        }),
        EditKind::DeleteUnder => edit(doc, insert, |buf, cur| buf.delete_under(cur).is_some()),
        EditKind::DeleteBefore => edit(doc, insert, |buf, cur| {
            motion::character_left(buf, cur) && buf.delete_under(cur).is_some()
        }),
        EditKind::DeleteToLineEnd => edit(doc, insert, delete_to_line_end),
        EditKind::JoinLines => edit(doc, insert, |buf, cur| buf.merge_line_below(cur)),
        EditKind::DeleteLine => return delete_line(state, services),
        EditKind::YankLine => return yank_line(state, services),
        EditKind::Paste { before } => return paste(before, state, services),
        EditKind::ReplaceChar(c) => edit(doc, insert, |buf, cur| buf.replace_char(cur, c)),
    };
    tracing::trace!(target: "actions.dispatch", ?kind, changed, "edit");
    if changed {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

/// Run `f` as one edit. Outside Insert the cursor is clamped before the entry
/// closes, so the recorded redo cursor is the one the user ends up with.
fn edit(
    doc: &mut Document,
    insert: bool,
    f: impl FnOnce(&mut Buffer, &mut Position) -> bool,
) -> bool {
    doc.edit(|buf, cur| {
        let changed = f(buf, cur);
        if !insert {
            motion::clamp(buf, cur, false);
        }
        changed
    })
}

fn delete_to_line_end(buf: &mut Buffer, cur: &mut Position) -> bool {
    let len = buf.line_len(cur.row);
    if cur.col >= len {
        return false;
    }
    let min = *cur;
    let max = Position::new(cur.row, len - 1);
    !buf.delete_runes_in_range(min, max, false, cur).is_empty()
}

/// `dd`: remove the cursor line and put it on the clipboard.
fn delete_line(state: &mut EditorState, services: &mut Services<'_>) -> DispatchResult {
    let mut removed = Vec::new();
    state.document.edit(|buf, cur| {
        removed = buf.delete_lines(cur.row, cur.row, cur);
        motion::first_non_blank(buf, cur);
        !removed.is_empty()
    });
    let mut text = removed.join("\n");
    text.push('\n');
    clipboard_write(services, &text)
}

/// `yy`: copy the cursor line.
fn yank_line(state: &mut EditorState, services: &mut Services<'_>) -> DispatchResult {
    let doc = &state.document;
    let mut text = doc.buffer.line_string(doc.cursor.row);
    text.push('\n');
    clipboard_write(services, &text)
}

/// Write `text` to the clipboard, turning failure into a status message.
pub(crate) fn clipboard_write(services: &mut Services<'_>, text: &str) -> DispatchResult {
    match services.clipboard.write(text) {
        Ok(()) => DispatchResult::dirty(),
        Err(err) => {
            tracing::warn!(target: "actions.dispatch", %err, "clipboard_write_failed");
            DispatchResult::error(err.to_string())
        }
    }
}

/// `p` / `P`. Text ending in a newline is pasted as whole lines below (or
/// above) the cursor line; anything else goes after (or at) the cursor.
fn paste(before: bool, state: &mut EditorState, services: &mut Services<'_>) -> DispatchResult {
    let text = match services.clipboard.read() {
        Ok(text) => text,
        Err(ClipboardError::Empty) => return DispatchResult::warning("Nothing to paste"),
        Err(err) => {
            tracing::warn!(target: "actions.dispatch", %err, "clipboard_read_failed");
            return DispatchResult::error(err.to_string());
        }
    };
    if text.is_empty() {
        return DispatchResult::warning("Nothing to paste");
    }
    let doc = &mut state.document;
    if let Some(body) = text.strip_suffix('\n') {
        let lines: Vec<String> = body.split('\n').map(String::from).collect();
        doc.edit(|buf, cur| {
            if before {
                buf.insert_lines_above(cur, &lines);
            } else {
                buf.insert_lines_below(cur, &lines);
            }
            motion::clamp(buf, cur, false);
            true
        });
        tracing::trace!(target: "actions.dispatch", lines = lines.len(), before, "paste_lines");
    } else {
        doc.edit(|buf, cur| {
            if !before && buf.line_len(cur.row) > 0 {
                motion::character_right(buf, cur, true);
            }
            buf.insert_text(cur, &text);
            motion::character_left(buf, cur);
            motion::clamp(buf, cur, false);
            true
        });
        tracing::trace!(target: "actions.dispatch", chars = text.chars().count(), before, "paste_chars");
    }
    DispatchResult::dirty()
}
