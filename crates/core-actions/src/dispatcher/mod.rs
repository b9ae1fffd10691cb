//! Dispatcher applying [`Action`] to editor state.
//!
//! Sub-modules by concern:
//! * `motion`    - cursor movement
//! * `mode`      - applying mode transitions and their effects
//! * `edit`      - text mutation, yank and paste
//! * `selection` - visual-mode operators
//! * `search`    - stepping through matches
//! * `command`   - `:` command execution
//! * `undo`      - undo / redo
//!
//! Every handler answers with a [`DispatchResult`]; the caller decides how to
//! render the status message and when to run a deferred follow-up.

use crate::Action;
use crate::prompt::LinePrompt;
use core_state::{Clipboard, DocumentProvider, EditorState};
use core_text::Position;
use std::time::Duration;

mod command;
mod command_parser;
mod edit;
mod mode;
mod motion;
mod search;
mod selection;
mod undo;

pub use command_parser::{CommandParser, ParsedCommand, SetOption};
pub(crate) use command::open_document;
pub(crate) use mode::apply_event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    #[default]
    Info,
    Warning,
    Error,
}

/// Text for the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    /// Status-bar column the message starts at.
    pub column: u16,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            column: 0,
        }
    }

    pub fn at_column(mut self, column: u16) -> Self {
        self.column = column;
        self
    }
}

/// Follow-up the host runs after `after` has elapsed, unless another key
/// arrives first (which runs it immediately).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferred {
    pub after: Duration,
    pub action: DeferredAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// End a visual yank: drop the highlight and move the cursor to `to`.
    FinishYank { to: Position },
}

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// Something visible changed; re-render.
    pub dirty: bool,
    pub quit: bool,
    pub status: Option<StatusMessage>,
    pub deferred: Option<Deferred>,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }

    pub fn clean() -> Self {
        Self::default()
    }

    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            ..Self::default()
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::dirty().with_status(StatusMessage::new(text, StatusKind::Info))
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::dirty().with_status(StatusMessage::new(text, StatusKind::Warning))
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::dirty().with_status(StatusMessage::new(text, StatusKind::Error))
    }

    pub fn with_status(mut self, status: StatusMessage) -> Self {
        self.status = Some(status);
        self.dirty = true;
        self
    }

    pub fn with_deferred(mut self, deferred: Deferred) -> Self {
        self.deferred = Some(deferred);
        self
    }

    /// Fold a later result into this one. The later status and deferred
    /// follow-up win when both carry one.
    pub fn merge(mut self, later: DispatchResult) -> Self {
        self.dirty |= later.dirty;
        self.quit |= later.quit;
        if later.status.is_some() {
            self.status = later.status;
        }
        if later.deferred.is_some() {
            self.deferred = later.deferred;
        }
        self
    }
}

/// Host capabilities a dispatch may use.
pub struct Services<'a> {
    pub clipboard: &'a mut dyn Clipboard,
    pub documents: &'a mut dyn DocumentProvider,
    pub prompt: &'a mut dyn LinePrompt,
}

/// Apply an action to editor state.
pub fn dispatch(
    action: Action,
    state: &mut EditorState,
    services: &mut Services<'_>,
) -> DispatchResult {
    tracing::trace!(target: "actions.dispatch", ?action, mode = ?state.mode, "dispatch");
    let result = match action {
        Action::Motion(kind) => motion::handle_motion(kind, state),
        // The editor waits for the target key and dispatches a FindChar motion.
        Action::AwaitFindChar { .. } => DispatchResult::clean(),
        Action::Insert(at) => mode::handle_insert(at, state, services),
        Action::Edit(kind) => edit::handle_edit(kind, state, services),
        Action::Visual(op) => selection::handle_visual(op, state, services),
        Action::Mode(event) => mode::apply_event(&event, state, services),
        Action::Undo => undo::handle_undo(state),
        Action::Redo => undo::handle_redo(state),
        Action::SearchStep { backward } => search::handle_step(backward, state),
    };
    if let Some(status) = &result.status {
        tracing::debug!(target: "actions.dispatch", kind = ?status.kind, "status");
    }
    result
}

/// Run a deferred follow-up.
pub fn run_deferred(
    action: DeferredAction,
    state: &mut EditorState,
    services: &mut Services<'_>,
) -> DispatchResult {
    match action {
        DeferredAction::FinishYank { to } => selection::finish_yank(to, state, services),
    }
}
