//! Pure mode transition table.
//!
//! `transition(mode, event)` decides the next mode and the side effects the
//! dispatcher must run, in order. Nothing here touches editor state, so the
//! whole table is testable without a buffer.

use core_state::{Mode, SelectionMode};
use smallvec::SmallVec;

/// Effects of one transition; never more than three.
pub type Effects = SmallVec<[Effect; 3]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeEvent {
    EnterInsert,
    Escape,
    ToggleVisual(SelectionMode),
    EnterReplace,
    ReplaceDone,
    EnterCommand,
    EnterSearchPrompt,
    PromptConfirmed(String),
    PromptCancelled,
    /// A key Search mode does not handle.
    LeaveSearch,
    /// A visual operator finished with the selection.
    SelectionConsumed,
    /// `c` in a visual mode: delete the selection and start inserting.
    ChangeSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OpenHistoryEntry,
    FinalizeHistoryEntry,
    /// Pull the cursor back onto the line if it rests past the last character.
    ClampCursor,
    StartSelection(SelectionMode),
    ChangeSelectionMode(SelectionMode),
    ClearSelection,
    DeleteSelection,
    OpenPrompt(char),
    RunCommand(String),
    ConfirmSearch(String),
    ClearSearch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: Mode,
    pub effects: Effects,
}

impl Transition {
    fn to<const N: usize>(next: Mode, effects: [Effect; N]) -> Self {
        Self {
            next,
            effects: effects.into_iter().collect(),
        }
    }

    fn stay(mode: Mode) -> Self {
        Self::to(mode, [])
    }

    /// True when the mode changes or any effect runs.
    pub fn is_change(&self, from: Mode) -> bool {
        self.next != from || !self.effects.is_empty()
    }
}

pub fn visual_mode(selection: SelectionMode) -> Mode {
    match selection {
        SelectionMode::None => Mode::Normal,
        SelectionMode::Visual => Mode::Visual,
        SelectionMode::VisualLine => Mode::VisualLine,
        SelectionMode::VisualBlock => Mode::VisualBlock,
    }
}

pub fn transition(mode: Mode, event: &ModeEvent) -> Transition {
    use Effect as F;
    use Mode::*;
    use ModeEvent as E;
    match (mode, event) {
        (Normal, E::EnterInsert) => Transition::to(Insert, [F::OpenHistoryEntry]),
        (Insert, E::Escape) => Transition::to(Normal, [F::ClampCursor, F::FinalizeHistoryEntry]),

        (_, E::ToggleVisual(SelectionMode::None)) => Transition::stay(mode),
        (Normal, E::ToggleVisual(sel)) => Transition::to(visual_mode(*sel), [F::StartSelection(*sel)]),
        (Visual | VisualLine | VisualBlock, E::ToggleVisual(sel)) => {
            if mode.selection_mode() == *sel {
                Transition::to(Normal, [F::ClearSelection])
            } else {
                Transition::to(visual_mode(*sel), [F::ChangeSelectionMode(*sel)])
            }
        }
        (Visual | VisualLine | VisualBlock, E::Escape) => Transition::to(Normal, [F::ClearSelection]),
        (Visual | VisualLine | VisualBlock, E::SelectionConsumed) => {
            Transition::to(Normal, [F::ClearSelection, F::ClampCursor])
        }
        (Visual | VisualLine | VisualBlock, E::ChangeSelection) => Transition::to(
            Insert,
            [F::OpenHistoryEntry, F::DeleteSelection, F::ClearSelection],
        ),

        (Normal, E::EnterReplace) => Transition::to(Replace, []),
        (Replace, E::ReplaceDone | E::Escape) => Transition::to(Normal, [F::ClampCursor]),

        (Normal, E::EnterCommand) => Transition::to(Command, [F::OpenPrompt(':')]),
        (Normal | Search, E::EnterSearchPrompt) => Transition::to(SearchPrompt, [F::OpenPrompt('/')]),
        (Command, E::PromptConfirmed(text)) => Transition::to(Normal, [F::RunCommand(text.clone())]),
        (Command, E::PromptCancelled) => Transition::to(Normal, []),
        (SearchPrompt, E::PromptConfirmed(query)) => {
            Transition::to(Search, [F::ConfirmSearch(query.clone())])
        }
        (SearchPrompt, E::PromptCancelled) => Transition::to(Normal, [F::ClearSearch]),
        (Search, E::Escape) => Transition::to(Normal, [F::ClearSearch]),
        (Search, E::LeaveSearch) => Transition::to(Normal, []),

        _ => Transition::stay(mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn effects(t: &Transition) -> Vec<Effect> {
        t.effects.to_vec()
    }

    #[test]
    fn insert_opens_and_finalizes_history() {
        let t = transition(Mode::Normal, &ModeEvent::EnterInsert);
        assert_eq!(t.next, Mode::Insert);
        assert_eq!(effects(&t), vec![Effect::OpenHistoryEntry]);
        let t = transition(Mode::Insert, &ModeEvent::Escape);
        assert_eq!(t.next, Mode::Normal);
        assert_eq!(
            effects(&t),
            vec![Effect::ClampCursor, Effect::FinalizeHistoryEntry]
        );
    }

    #[test]
    fn reentering_active_visual_variant_returns_to_normal() {
        for sel in [
            SelectionMode::Visual,
            SelectionMode::VisualLine,
            SelectionMode::VisualBlock,
        ] {
            let enter = transition(Mode::Normal, &ModeEvent::ToggleVisual(sel));
            assert_eq!(enter.next, visual_mode(sel));
            let leave = transition(enter.next, &ModeEvent::ToggleVisual(sel));
            assert_eq!(leave.next, Mode::Normal);
            assert_eq!(effects(&leave), vec![Effect::ClearSelection]);
        }
    }

    #[test]
    fn switching_visual_variant_keeps_selection() {
        let t = transition(Mode::Visual, &ModeEvent::ToggleVisual(SelectionMode::VisualLine));
        assert_eq!(t.next, Mode::VisualLine);
        assert_eq!(
            effects(&t),
            vec![Effect::ChangeSelectionMode(SelectionMode::VisualLine)]
        );
    }

    #[test]
    fn prompts_confirm_into_their_follow_up() {
        let t = transition(Mode::Command, &ModeEvent::PromptConfirmed("w".into()));
        assert_eq!(t.next, Mode::Normal);
        assert_eq!(effects(&t), vec![Effect::RunCommand("w".into())]);
        let t = transition(Mode::SearchPrompt, &ModeEvent::PromptConfirmed("ab".into()));
        assert_eq!(t.next, Mode::Search);
        assert_eq!(effects(&t), vec![Effect::ConfirmSearch("ab".into())]);
        let t = transition(Mode::SearchPrompt, &ModeEvent::PromptCancelled);
        assert_eq!(t.next, Mode::Normal);
    }

    #[test]
    fn replace_returns_to_normal() {
        assert_eq!(transition(Mode::Normal, &ModeEvent::EnterReplace).next, Mode::Replace);
        assert_eq!(transition(Mode::Replace, &ModeEvent::ReplaceDone).next, Mode::Normal);
        assert_eq!(transition(Mode::Replace, &ModeEvent::Escape).next, Mode::Normal);
    }

    #[test]
    fn unrelated_events_leave_mode_untouched() {
        let t = transition(Mode::Insert, &ModeEvent::EnterCommand);
        assert_eq!(t.next, Mode::Insert);
        assert!(!t.is_change(Mode::Insert));
        let t = transition(Mode::Command, &ModeEvent::ToggleVisual(SelectionMode::Visual));
        assert_eq!(t.next, Mode::Command);
    }

    #[test]
    fn search_mode_exits() {
        assert_eq!(
            effects(&transition(Mode::Search, &ModeEvent::Escape)),
            vec![Effect::ClearSearch]
        );
        let t = transition(Mode::Search, &ModeEvent::LeaveSearch);
        assert_eq!(t.next, Mode::Normal);
        assert!(t.effects.is_empty());
        assert_eq!(
            transition(Mode::Search, &ModeEvent::EnterSearchPrompt).next,
            Mode::SearchPrompt
        );
    }
}
