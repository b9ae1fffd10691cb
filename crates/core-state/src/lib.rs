//! Editor state: the open document, current mode, visual selection and
//! runtime settings.
//!
//! Everything here is owned by a single editing session and mutated only by
//! the dispatcher in `core-actions`. Submodules:
//! - [`selection`]: anchor/cursor ranges, extraction, render split.
//! - [`history`]: patch-based linear undo with a fingerprint guard.
//! - [`search`]: per-row match map with wrap-around stepping.
//! - [`document`]: buffer + cursor + history + search for one path.
//! - [`io`]: document provider and clipboard capabilities.

pub mod document;
pub mod history;
pub mod io;
pub mod search;
pub mod selection;

use core_text::Position;
pub use document::Document;
pub use history::{HISTORY_LIMIT_DEFAULT, History, HistoryEntry, HistoryStep, Patch, PatchError};
pub use io::{
    Clipboard, ClipboardError, DocumentError, DocumentProvider, LoadedDocument, MemoryClipboard,
    SaveReport,
};
pub use search::SearchState;
pub use selection::{RowSplit, Selection, SelectionMode};

/// Current editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual,
    VisualLine,
    VisualBlock,
    /// Waiting for the single character that overwrites the one under the cursor.
    Replace,
    /// Line prompt for `:` commands.
    Command,
    /// Line prompt for a `/` query.
    SearchPrompt,
    /// A confirmed query is active; `n`/`N` step through matches.
    Search,
}

impl Mode {
    /// Status-bar label.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Visual => "VISUAL",
            Mode::VisualLine => "V-LINE",
            Mode::VisualBlock => "V-BLOCK",
            Mode::Replace => "REPLACE",
            Mode::Command => "COMMAND",
            Mode::SearchPrompt => "SEARCH",
            Mode::Search => "SEARCH",
        }
    }

    pub fn is_visual(self) -> bool {
        self.selection_mode() != SelectionMode::None
    }

    /// Insert-adjacent modes let the cursor rest one past the last character.
    pub fn allows_overshoot(self) -> bool {
        matches!(self, Mode::Insert)
    }

    pub fn selection_mode(self) -> SelectionMode {
        match self {
            Mode::Visual => SelectionMode::Visual,
            Mode::VisualLine => SelectionMode::VisualLine,
            Mode::VisualBlock => SelectionMode::VisualBlock,
            _ => SelectionMode::None,
        }
    }
}

/// Runtime toggles, seeded from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub line_numbers: bool,
    pub wrap: bool,
    pub tab_width: usize,
    pub history_limit: usize,
    pub highlight_delay_ms: u64,
    pub case_sensitive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            line_numbers: true,
            wrap: true,
            tab_width: 4,
            history_limit: HISTORY_LIMIT_DEFAULT,
            highlight_delay_ms: 150,
            case_sensitive: false,
        }
    }
}

/// Top-level state for one editing session.
#[derive(Debug, Clone, Default)]
pub struct EditorState {
    pub document: Document,
    pub mode: Mode,
    pub selection: Selection,
    pub settings: Settings,
}

impl EditorState {
    pub fn new(document: Document, settings: Settings) -> Self {
        let mut state = Self {
            document,
            mode: Mode::Normal,
            selection: Selection::default(),
            settings,
        };
        state.apply_settings_to_document();
        state
    }

    /// Swap in another document wholesale, returning the previous one.
    pub fn replace_document(&mut self, document: Document) -> Document {
        let previous = std::mem::replace(&mut self.document, document);
        self.selection.clear();
        self.mode = Mode::Normal;
        self.apply_settings_to_document();
        previous
    }

    fn apply_settings_to_document(&mut self) {
        let doc = &mut self.document;
        doc.set_history_limit(self.settings.history_limit);
        doc.search
            .set_case_sensitive(self.settings.case_sensitive, &doc.buffer);
    }

    pub fn cursor(&self) -> Position {
        self.document.cursor
    }

    pub fn selection_range(&self) -> Option<(Position, Position)> {
        self.selection.range(self.document.cursor)
    }

    pub fn selected_line_count(&self) -> usize {
        self.selection.selected_line_count(self.document.cursor)
    }
}
