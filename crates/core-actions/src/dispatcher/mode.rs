//! Applying mode transitions.
//!
//! `crate::mode::transition` decides the next mode and the effects; this
//! module runs the effects in order against the editor state and then
//! switches the mode.

use super::edit::clipboard_write;
use super::selection::clear_for_change;
use super::{DispatchResult, Services, command};
use crate::InsertAt;
use crate::mode::{Effect, ModeEvent, transition};
use core_state::{EditorState, Mode};
use core_text::motion;
use tracing::{debug, trace};

pub(crate) fn apply_event(
    event: &ModeEvent,
    state: &mut EditorState,
    services: &mut Services<'_>,
) -> DispatchResult {
    let from = state.mode;
    let t = transition(from, event);
    if !t.is_change(from) {
        trace!(target: "actions.mode", ?from, ?event, "transition_ignored");
        return DispatchResult::clean();
    }
    let mut result = DispatchResult::dirty();
    for effect in &t.effects {
        let r = apply_effect(effect, state, services);
        result = result.merge(r);
    }
    state.mode = t.next;
    debug!(target: "actions.mode", ?from, to = ?state.mode, "mode_changed");
    result
}

fn apply_effect(
    effect: &Effect,
    state: &mut EditorState,
    services: &mut Services<'_>,
) -> DispatchResult {
    match effect {
        Effect::OpenHistoryEntry => {
            state.document.begin_edit();
            DispatchResult::clean()
        }
        Effect::FinalizeHistoryEntry => {
            let recorded = state.document.finish_edit();
            trace!(target: "actions.mode", recorded, "history_entry_finalized");
            DispatchResult::clean()
        }
        Effect::ClampCursor => {
            let doc = &mut state.document;
            if motion::is_exceeding_line(&doc.buffer, &mut doc.cursor) {
                motion::clamp(&doc.buffer, &mut doc.cursor, false);
            }
            doc.buffer.sync_row_offset(&mut doc.cursor);
            DispatchResult::clean()
        }
        Effect::StartSelection(sel) => {
            state.selection.start(*sel, state.document.cursor);
            DispatchResult::clean()
        }
        Effect::ChangeSelectionMode(sel) => {
            state.selection.set_mode(*sel);
            DispatchResult::clean()
        }
        Effect::ClearSelection => {
            state.selection.clear();
            DispatchResult::clean()
        }
        Effect::DeleteSelection => {
            let removed = clear_for_change(state);
            if removed.is_empty() {
                DispatchResult::clean()
            } else {
                clipboard_write(services, &removed)
            }
        }
        Effect::OpenPrompt(prefix) => {
            services.prompt.begin(*prefix);
            DispatchResult::clean()
        }
        Effect::RunCommand(raw) => command::execute(raw, state, services),
        Effect::ConfirmSearch(query) => confirm_search(query, state),
        Effect::ClearSearch => {
            state.document.search.clear();
            DispatchResult::clean()
        }
    }
}

/// Activate `query` and jump to its first match. An empty query reuses the
/// previous one.
fn confirm_search(query: &str, state: &mut EditorState) -> DispatchResult {
    let doc = &mut state.document;
    let query = if query.is_empty() {
        doc.search.last_confirmed().to_string()
    } else {
        query.to_string()
    };
    if query.is_empty() {
        return DispatchResult::clean();
    }
    doc.search.confirm(&query, &doc.buffer);
    match doc.search.first_match() {
        Some(pos) => {
            doc.cursor = pos;
            doc.buffer.sync_row_offset(&mut doc.cursor);
            debug!(target: "actions.mode", matches = doc.search.match_count(), "search_confirmed");
            DispatchResult::dirty()
        }
        None => DispatchResult::warning(format!("Pattern not found: {query}")),
    }
}

/// `i a I A o O`: position the cursor, then enter Insert. The history entry
/// opens first so undo returns to where the command was issued.
pub(crate) fn handle_insert(
    at: InsertAt,
    state: &mut EditorState,
    services: &mut Services<'_>,
) -> DispatchResult {
    let opened = !state.document.is_editing();
    state.document.begin_edit();
    {
        let doc = &mut state.document;
        let buf = &doc.buffer;
        let pos = &mut doc.cursor;
        match at {
            InsertAt::Cursor | InsertAt::LineBelow | InsertAt::LineAbove => {}
            InsertAt::After => {
                motion::character_right(buf, pos, true);
            }
            InsertAt::LineStart => {
                motion::first_non_blank(buf, pos);
            }
            InsertAt::LineEnd => {
                motion::line_end(buf, pos, true);
            }
        }
    }
    let result = apply_event(&ModeEvent::EnterInsert, state, services);
    if state.mode != Mode::Insert {
        if opened {
            state.document.finish_edit();
        }
        return result;
    }
    match at {
        InsertAt::LineBelow => {
            state.document.edit(|buf, cur| {
                buf.empty_line_below(cur);
                true
            });
        }
        InsertAt::LineAbove => {
            state.document.edit(|buf, cur| {
                buf.empty_line_above(cur);
                true
            });
        }
        _ => {}
    }
    result
}
