//! Actions, the modal state machine and the editor orchestrator.
//!
//! Keys flow `Editor::handle_key` -> `core_keymap::Keymap` -> [`Action`] ->
//! `dispatcher::dispatch`, which mutates `core_state::EditorState` and
//! answers with a [`DispatchResult`]. Mode changes go through the pure
//! [`mode::transition`] table; the dispatcher applies the effects it returns.

pub mod bindings;
pub mod dispatcher;
pub mod editor;
pub mod mode;
pub mod prompt;

pub use bindings::default_bindings;
pub use dispatcher::{
    CommandParser, Deferred, DeferredAction, DispatchResult, ParsedCommand, Services, SetOption,
    StatusKind, StatusMessage, dispatch, run_deferred,
};
pub use editor::{Editor, EditorPanel};
pub use mode::{Effect, ModeEvent, Transition, transition};
pub use prompt::{LineInput, LinePrompt, PromptOutcome};

use core_config::Config;
use core_state::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    WordRight,
    WordLeft,
    WordEnd,
    LineStart,
    LineEnd,
    FirstNonBlank,
    BufferStart,
    BufferEnd,
    FindChar { target: char, backward: bool },
}

/// Where the cursor goes when Insert mode is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    Cursor,
    After,
    LineStart,
    LineEnd,
    LineBelow,
    LineAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(char),
    InsertNewline,
    InsertTab,
    Backspace,
    DeleteForward,
    DeleteUnder,
    DeleteBefore,
    DeleteToLineEnd,
    JoinLines,
    DeleteLine,
    YankLine,
    Paste { before: bool },
    ReplaceChar(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualOp {
    Delete,
    Yank,
    Change,
    SwapEnds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Motion(MotionKind),
    /// Wait for the next key and jump to it (`f` / `F`).
    AwaitFindChar { backward: bool },
    Insert(InsertAt),
    Edit(EditKind),
    Visual(VisualOp),
    Mode(ModeEvent),
    Undo,
    Redo,
    SearchStep { backward: bool },
}

/// Copy configuration lookups into runtime settings.
pub fn settings_from_config(config: &Config) -> Settings {
    Settings {
        line_numbers: config.line_numbers(),
        wrap: config.wrap(),
        tab_width: config.tab_width(),
        history_limit: config.history_limit(),
        highlight_delay_ms: config.highlight_delay_ms(),
        case_sensitive: config.search_case_sensitive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config_defaults() {
        let settings = settings_from_config(&Config::default());
        assert_eq!(settings, Settings::default());
    }
}
