//! Default key bindings.
//!
//! Every binding is attached to the editor panel; hosts with more panels add
//! their own through `Keymap::bind`.

use crate::mode::ModeEvent;
use crate::{Action, EditKind, InsertAt, MotionKind, VisualOp};
use core_keymap::{Binding, PanelRef};
use core_state::{Mode, SelectionMode};

const VISUAL_MODES: [Mode; 3] = [Mode::Visual, Mode::VisualLine, Mode::VisualBlock];

struct Builder {
    panels: [PanelRef; 1],
    bindings: Vec<Binding<Mode, Action>>,
}

impl Builder {
    fn bind(&mut self, keys: &[&str], modes: &[Mode], action: Action) {
        let mut binding = Binding::new(keys.iter().copied());
        for &mode in modes {
            binding = binding.when(mode, &self.panels, action.clone());
        }
        self.bindings.push(binding);
    }
}

pub fn default_bindings(panel: PanelRef) -> Vec<Binding<Mode, Action>> {
    let mut b = Builder {
        panels: [panel],
        bindings: Vec::new(),
    };
    let normal = &[Mode::Normal][..];
    let motion_modes = &[
        Mode::Normal,
        Mode::Visual,
        Mode::VisualLine,
        Mode::VisualBlock,
    ][..];
    let arrow_modes = &[
        Mode::Normal,
        Mode::Insert,
        Mode::Visual,
        Mode::VisualLine,
        Mode::VisualBlock,
    ][..];

    b.bind(&["h"], motion_modes, Action::Motion(MotionKind::Left));
    b.bind(&["l"], motion_modes, Action::Motion(MotionKind::Right));
    b.bind(&["j"], motion_modes, Action::Motion(MotionKind::Down));
    b.bind(&["k"], motion_modes, Action::Motion(MotionKind::Up));
    b.bind(&["left"], arrow_modes, Action::Motion(MotionKind::Left));
    b.bind(&["right"], arrow_modes, Action::Motion(MotionKind::Right));
    b.bind(&["down"], arrow_modes, Action::Motion(MotionKind::Down));
    b.bind(&["up"], arrow_modes, Action::Motion(MotionKind::Up));
    b.bind(&["w"], motion_modes, Action::Motion(MotionKind::WordRight));
    b.bind(&["b"], motion_modes, Action::Motion(MotionKind::WordLeft));
    b.bind(&["e"], motion_modes, Action::Motion(MotionKind::WordEnd));
    b.bind(&["0"], motion_modes, Action::Motion(MotionKind::LineStart));
    b.bind(&["^"], motion_modes, Action::Motion(MotionKind::FirstNonBlank));
    b.bind(&["$"], motion_modes, Action::Motion(MotionKind::LineEnd));
    b.bind(&["gg"], motion_modes, Action::Motion(MotionKind::BufferStart));
    b.bind(&["G"], motion_modes, Action::Motion(MotionKind::BufferEnd));
    b.bind(&["f"], motion_modes, Action::AwaitFindChar { backward: false });
    b.bind(&["F"], motion_modes, Action::AwaitFindChar { backward: true });

    b.bind(&["i"], normal, Action::Insert(InsertAt::Cursor));
    b.bind(&["a"], normal, Action::Insert(InsertAt::After));
    b.bind(&["I"], normal, Action::Insert(InsertAt::LineStart));
    b.bind(&["A"], normal, Action::Insert(InsertAt::LineEnd));
    b.bind(&["o"], normal, Action::Insert(InsertAt::LineBelow));
    b.bind(&["O"], normal, Action::Insert(InsertAt::LineAbove));

    b.bind(&["x", "delete"], normal, Action::Edit(EditKind::DeleteUnder));
    b.bind(&["X"], normal, Action::Edit(EditKind::DeleteBefore));
    b.bind(&["D"], normal, Action::Edit(EditKind::DeleteToLineEnd));
    b.bind(&["J"], normal, Action::Edit(EditKind::JoinLines));
    b.bind(&["r"], normal, Action::Mode(ModeEvent::EnterReplace));
    b.bind(&["dd"], normal, Action::Edit(EditKind::DeleteLine));
    b.bind(&["yy"], normal, Action::Edit(EditKind::YankLine));
    b.bind(&["p"], normal, Action::Edit(EditKind::Paste { before: false }));
    b.bind(&["P"], normal, Action::Edit(EditKind::Paste { before: true }));
    b.bind(&["u"], normal, Action::Undo);
    b.bind(&["ctrl+r"], normal, Action::Redo);
    b.bind(&[":"], normal, Action::Mode(ModeEvent::EnterCommand));

    for (key, sel) in [
        ("v", SelectionMode::Visual),
        ("V", SelectionMode::VisualLine),
        ("ctrl+v", SelectionMode::VisualBlock),
    ] {
        b.bind(&[key], motion_modes, Action::Mode(ModeEvent::ToggleVisual(sel)));
    }
    b.bind(&["d", "x"], &VISUAL_MODES, Action::Visual(VisualOp::Delete));
    b.bind(&["y"], &VISUAL_MODES, Action::Visual(VisualOp::Yank));
    b.bind(&["c"], &VISUAL_MODES, Action::Visual(VisualOp::Change));
    b.bind(&["o"], &VISUAL_MODES, Action::Visual(VisualOp::SwapEnds));
    b.bind(&["esc"], &VISUAL_MODES, Action::Mode(ModeEvent::Escape));

    b.bind(&["esc"], &[Mode::Insert], Action::Mode(ModeEvent::Escape));
    b.bind(&["enter"], &[Mode::Insert], Action::Edit(EditKind::InsertNewline));
    b.bind(&["backspace"], &[Mode::Insert], Action::Edit(EditKind::Backspace));
    b.bind(&["delete"], &[Mode::Insert], Action::Edit(EditKind::DeleteForward));
    b.bind(&["tab"], &[Mode::Insert], Action::Edit(EditKind::InsertTab));

    b.bind(&["/"], &[Mode::Normal, Mode::Search], Action::Mode(ModeEvent::EnterSearchPrompt));
    b.bind(&["n"], &[Mode::Search], Action::SearchStep { backward: false });
    b.bind(&["N"], &[Mode::Search], Action::SearchStep { backward: true });
    b.bind(&["esc"], &[Mode::Search], Action::Mode(ModeEvent::Escape));

    b.bindings
}
