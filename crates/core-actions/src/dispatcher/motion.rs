//! Cursor movement.
//!
//! Motions delegate to `core_text::motion`; the only mode dependence is
//! whether the cursor may rest one past the last character (Insert). In the
//! visual modes the selection follows the cursor implicitly because its range
//! is always computed from the anchor and the live cursor.

use super::DispatchResult;
use crate::MotionKind;
use core_state::EditorState;
use core_text::motion;

pub(crate) fn handle_motion(kind: MotionKind, state: &mut EditorState) -> DispatchResult {
    let overshoot = state.mode.allows_overshoot();
    let doc = &mut state.document;
    let buf = &doc.buffer;
    let pos = &mut doc.cursor;
    let moved = match kind {
        MotionKind::Left => motion::character_left(buf, pos),
        MotionKind::Right => motion::character_right(buf, pos, overshoot),
        MotionKind::Up => motion::up(buf, pos, overshoot),
        MotionKind::Down => motion::down(buf, pos, overshoot),
        MotionKind::WordRight => motion::word_right(buf, pos),
        MotionKind::WordLeft => motion::word_left(buf, pos),
        MotionKind::WordEnd => motion::word_right_end(buf, pos),
        MotionKind::LineStart => motion::line_start(buf, pos),
        MotionKind::LineEnd => motion::line_end(buf, pos, overshoot),
        MotionKind::FirstNonBlank => motion::first_non_blank(buf, pos),
        MotionKind::BufferStart => motion::buffer_start(buf, pos),
        MotionKind::BufferEnd => motion::buffer_end(buf, pos),
        MotionKind::FindChar { target, backward } => {
            motion::find_character(buf, pos, target, backward)
        }
    };
    if !overshoot {
        motion::clamp(buf, pos, false);
    }
    tracing::trace!(
        target: "actions.dispatch",
        ?kind,
        moved,
        row = pos.row,
        col = pos.col,
        "motion"
    );
    if moved {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
