//! Undo / redo.
//!
//! Both directions are silent no-ops at the ends of the history and when the
//! fingerprint guard rejects the stored patch.

use super::DispatchResult;
use core_state::EditorState;

pub(crate) fn handle_undo(state: &mut EditorState) -> DispatchResult {
    let applied = state.document.undo();
    tracing::trace!(target: "actions.dispatch", op = "undo", applied, "history");
    if applied {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

pub(crate) fn handle_redo(state: &mut EditorState) -> DispatchResult {
    let applied = state.document.redo();
    tracing::trace!(target: "actions.dispatch", op = "redo", applied, "history");
    if applied {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
