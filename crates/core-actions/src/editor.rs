//! Editor orchestrator: routes keys to the prompt, the keymap or the
//! mode-specific fallbacks, and owns the host capabilities.
//!
//! One `handle_key` call is one input -> handler -> result cycle. A deferred
//! follow-up from an earlier key runs first whenever a new key arrives, so
//! nothing is ever left half-applied between keystrokes.

use crate::bindings::default_bindings;
use crate::dispatcher::{
    DeferredAction, DispatchResult, Services, apply_event, dispatch, open_document, run_deferred,
};
use crate::mode::ModeEvent;
use crate::prompt::{LineInput, LinePrompt, PromptOutcome};
use crate::{Action, EditKind, MotionKind};
use core_events::KeyEvent;
use core_keymap::{Binding, Focus, Keymap, Outcome, PanelRef};
use core_state::{Clipboard, Document, DocumentProvider, EditorState, Mode, Settings};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, trace};

/// The text area. Focus is a plain flag the host flips.
#[derive(Debug)]
pub struct EditorPanel {
    focused: Cell<bool>,
}

impl EditorPanel {
    pub fn new() -> Self {
        Self {
            focused: Cell::new(true),
        }
    }
}

impl Default for EditorPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Focus for EditorPanel {
    fn focused(&self) -> bool {
        self.focused.get()
    }
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due: Instant,
    action: DeferredAction,
}

pub struct Editor {
    state: EditorState,
    keymap: Keymap<Mode, Action>,
    panel: Rc<EditorPanel>,
    prompt: Box<dyn LinePrompt>,
    clipboard: Box<dyn Clipboard>,
    documents: Box<dyn DocumentProvider>,
    /// `f` / `F` waiting for its target; the flag is `backward`.
    pending_find: Option<bool>,
    deferred: Option<Scheduled>,
    text_width: usize,
}

impl Editor {
    pub fn new(
        settings: Settings,
        clipboard: Box<dyn Clipboard>,
        documents: Box<dyn DocumentProvider>,
    ) -> Self {
        let panel = Rc::new(EditorPanel::new());
        let panel_ref: PanelRef = panel.clone();
        Self {
            state: EditorState::new(Document::default(), settings),
            keymap: Keymap::new(default_bindings(panel_ref)),
            panel,
            prompt: Box::new(LineInput::new()),
            clipboard,
            documents,
            pending_find: None,
            deferred: None,
            text_width: 0,
        }
    }

    /// Replace the built-in line prompt.
    pub fn with_prompt(mut self, prompt: Box<dyn LinePrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn prompt(&self) -> &dyn LinePrompt {
        self.prompt.as_ref()
    }

    /// The editor panel, for bindings a host adds with [`Editor::bind`].
    pub fn panel(&self) -> PanelRef {
        self.panel.clone()
    }

    pub fn bind(&mut self, binding: Binding<Mode, Action>) {
        self.keymap.bind(binding);
    }

    /// Keys of the chord in progress, for the status bar.
    pub fn pending_keys(&self) -> &str {
        match self.pending_find {
            Some(true) => "F",
            Some(false) => "f",
            None => self.keymap.pending(),
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.panel.focused.set(focused);
        self.pending_find = None;
        self.keymap.refresh_focus();
    }

    /// Width of the text area in cells; drives soft wrapping.
    pub fn set_text_width(&mut self, width: usize) {
        self.text_width = width;
        self.apply_wrap();
    }

    /// Open `path`, swapping the current document out.
    pub fn open(&mut self, path: PathBuf) -> DispatchResult {
        let mut services = Services {
            clipboard: self.clipboard.as_mut(),
            documents: self.documents.as_mut(),
            prompt: self.prompt.as_mut(),
        };
        let result = open_document(path, &mut self.state, &mut services);
        self.apply_wrap();
        result
    }

    /// When the pending deferred follow-up is due, if any.
    pub fn deferred_due(&self) -> Option<Instant> {
        self.deferred.map(|s| s.due)
    }

    /// Run the pending deferred follow-up now.
    pub fn fire_deferred(&mut self) -> DispatchResult {
        let Some(scheduled) = self.deferred.take() else {
            return DispatchResult::clean();
        };
        trace!(target: "actions.dispatch", action = ?scheduled.action, "deferred_fired");
        let mut services = Services {
            clipboard: self.clipboard.as_mut(),
            documents: self.documents.as_mut(),
            prompt: self.prompt.as_mut(),
        };
        run_deferred(scheduled.action, &mut self.state, &mut services)
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> DispatchResult {
        let flushed = self.fire_deferred();
        let result = flushed.merge(self.route_key(key));
        if let Some(deferred) = result.deferred {
            self.deferred = Some(Scheduled {
                due: Instant::now() + deferred.after,
                action: deferred.action,
            });
        }
        self.apply_wrap();
        result
    }

    fn route_key(&mut self, key: &KeyEvent) -> DispatchResult {
        match self.state.mode {
            Mode::Command | Mode::SearchPrompt => return self.prompt_key(key),
            Mode::Replace => {
                return match key.printable() {
                    Some(c) => self
                        .run(Action::Edit(EditKind::ReplaceChar(c)))
                        .merge(self.run(Action::Mode(ModeEvent::ReplaceDone))),
                    None => self.run(Action::Mode(ModeEvent::Escape)),
                };
            }
            _ => {}
        }
        if let Some(backward) = self.pending_find.take() {
            return match key.printable() {
                Some(target) => self.run(Action::Motion(MotionKind::FindChar { target, backward })),
                None => DispatchResult::dirty(),
            };
        }
        let mode = self.state.mode;
        match self.keymap.feed(key, mode) {
            Outcome::Fired(Action::AwaitFindChar { backward }) => {
                self.pending_find = Some(backward);
                DispatchResult::dirty()
            }
            Outcome::Fired(action) => self.run(action),
            Outcome::Pending => DispatchResult::dirty(),
            // An aborted chord only needs the pending indicator cleared.
            Outcome::Unmatched { chord: true, .. } => DispatchResult::dirty(),
            Outcome::Unmatched { sequence, .. } => match mode {
                Mode::Insert => match key.printable() {
                    Some(c) => self.run(Action::Edit(EditKind::InsertChar(c))),
                    None => DispatchResult::clean(),
                },
                Mode::Search => {
                    debug!(target: "actions.mode", sequence = sequence.as_str(), "search_left");
                    let left = self.run(Action::Mode(ModeEvent::LeaveSearch));
                    left.merge(self.route_key(key))
                }
                _ => DispatchResult::clean(),
            },
        }
    }

    fn prompt_key(&mut self, key: &KeyEvent) -> DispatchResult {
        let event = match self.prompt.handle_key(key) {
            PromptOutcome::Editing => {
                let query = self.prompt.text();
                if self.state.mode == Mode::SearchPrompt {
                    let doc = &mut self.state.document;
                    if query.is_empty() {
                        doc.search.clear();
                    } else {
                        doc.search.set_query(query, &doc.buffer);
                    }
                }
                return DispatchResult::dirty();
            }
            PromptOutcome::Confirmed(text) => ModeEvent::PromptConfirmed(text),
            PromptOutcome::Cancelled => ModeEvent::PromptCancelled,
        };
        let mut services = Services {
            clipboard: self.clipboard.as_mut(),
            documents: self.documents.as_mut(),
            prompt: self.prompt.as_mut(),
        };
        apply_event(&event, &mut self.state, &mut services)
    }

    fn run(&mut self, action: Action) -> DispatchResult {
        let mut services = Services {
            clipboard: self.clipboard.as_mut(),
            documents: self.documents.as_mut(),
            prompt: self.prompt.as_mut(),
        };
        dispatch(action, &mut self.state, &mut services)
    }

    fn apply_wrap(&mut self) {
        let width = if self.state.settings.wrap {
            self.text_width
        } else {
            0
        };
        let doc = &mut self.state.document;
        if doc.buffer.wrap_width() != width {
            doc.buffer.set_wrap_width(width);
            doc.buffer.sync_row_offset(&mut doc.cursor);
            debug!(target: "actions.dispatch", width, "wrap_width_applied");
        }
    }
}
