//! Visual-mode operators: delete, yank, change and swap ends.

use super::edit::clipboard_write;
use super::mode::apply_event;
use super::{Deferred, DeferredAction, DispatchResult, Services};
use crate::VisualOp;
use crate::mode::ModeEvent;
use core_state::EditorState;
use core_text::{Position, motion};
use std::time::Duration;

pub(crate) fn handle_visual(
    op: VisualOp,
    state: &mut EditorState,
    services: &mut Services<'_>,
) -> DispatchResult {
    if !state.selection.is_active() {
        return DispatchResult::clean();
    }
    match op {
        VisualOp::Delete => {
            let removed = delete_selection(state);
            let written = clipboard_write(services, &removed);
            written.merge(apply_event(&ModeEvent::SelectionConsumed, state, services))
        }
        VisualOp::Yank => yank(state, services),
        VisualOp::Change => apply_event(&ModeEvent::ChangeSelection, state, services),
        VisualOp::SwapEnds => {
            let doc = &mut state.document;
            state.selection.swap_ends(&doc.buffer, &mut doc.cursor);
            DispatchResult::dirty()
        }
    }
}

/// Remove the selected text as one edit and return it.
pub(crate) fn delete_selection(state: &mut EditorState) -> String {
    let selection = state.selection;
    let mut removed = String::new();
    state.document.edit(|buf, cur| {
        removed = selection.delete(buf, cur);
        motion::clamp(buf, cur, false);
        !removed.is_empty()
    });
    tracing::trace!(
        target: "actions.dispatch",
        mode = ?selection.mode(),
        chars = removed.chars().count(),
        "selection_deleted"
    );
    removed
}

/// Clear the selected text for `c`. Linewise selections keep one empty line
/// to type into; the cursor lands on the selection start.
pub(crate) fn clear_for_change(state: &mut EditorState) -> String {
    let selection = state.selection;
    let Some((min, max)) = selection.range(state.document.cursor) else {
        return String::new();
    };
    if !selection.is_linewise() {
        let removed = delete_selection(state);
        let doc = &mut state.document;
        doc.cursor = min;
        motion::clamp(&doc.buffer, &mut doc.cursor, true);
        return removed;
    }
    let mut removed = String::new();
    state.document.edit(|buf, cur| {
        removed = selection.selection_str(buf, *cur);
        if max.row > min.row {
            buf.delete_lines(min.row + 1, max.row, cur);
        }
        let mut at = Position::new(min.row, 0);
        let len = buf.line_len(min.row);
        if len > 0 {
            buf.delete_runes_in_range(at, Position::new(min.row, len - 1), false, &mut at);
        }
        *cur = Position::new(min.row, 0);
        !removed.is_empty()
    });
    removed
}

fn yank(state: &mut EditorState, services: &mut Services<'_>) -> DispatchResult {
    let text = state
        .selection
        .selection_str(&state.document.buffer, state.document.cursor);
    let written = clipboard_write(services, &text);
    let to = state
        .selection
        .range(state.document.cursor)
        .map_or(state.document.cursor, |(min, _)| min);
    let delay = state.settings.highlight_delay_ms;
    tracing::trace!(target: "actions.dispatch", chars = text.chars().count(), delay, "visual_yank");
    if delay == 0 {
        return written.merge(finish_yank(to, state, services));
    }
    written.with_deferred(Deferred {
        after: Duration::from_millis(delay),
        action: DeferredAction::FinishYank { to },
    })
}

/// Drop the yank highlight and put the cursor on the selection start.
pub(crate) fn finish_yank(
    to: Position,
    state: &mut EditorState,
    services: &mut Services<'_>,
) -> DispatchResult {
    if !state.mode.is_visual() {
        return DispatchResult::clean();
    }
    state.document.cursor = to;
    apply_event(&ModeEvent::SelectionConsumed, state, services)
}
