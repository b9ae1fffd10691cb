//! `n` / `N`: step through the matches of the active query.

use super::DispatchResult;
use core_state::EditorState;

pub(crate) fn handle_step(backward: bool, state: &mut EditorState) -> DispatchResult {
    let doc = &mut state.document;
    if !doc.search.is_active() {
        return DispatchResult::clean();
    }
    match doc.search.find_match(doc.cursor, backward) {
        Some(pos) => {
            let moved = pos.key() != doc.cursor.key();
            doc.cursor = pos;
            doc.buffer.sync_row_offset(&mut doc.cursor);
            tracing::trace!(target: "actions.dispatch", backward, row = pos.row, col = pos.col, "search_step");
            if moved {
                DispatchResult::dirty()
            } else {
                DispatchResult::clean()
            }
        }
        None => DispatchResult::warning(format!("Pattern not found: {}", doc.search.query())),
    }
}
