#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{DispatchResult, Editor};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_keymap::parse_sequence;
use core_state::{
    Clipboard, ClipboardError, Document, DocumentError, DocumentProvider, LoadedDocument,
    MemoryClipboard, SaveReport, Settings,
};
use core_text::Buffer;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// In-memory document store; clones share the same files.
#[derive(Clone, Default)]
pub struct MemoryDocuments {
    files: Rc<RefCell<HashMap<PathBuf, (String, bool)>>>,
}

impl MemoryDocuments {
    pub fn insert(&self, path: &str, content: &str, writable: bool) {
        self.files
            .borrow_mut()
            .insert(PathBuf::from(path), (content.to_string(), writable));
    }

    pub fn get(&self, path: &str) -> Option<String> {
        self.files
            .borrow()
            .get(Path::new(path))
            .map(|(content, _)| content.clone())
    }
}

impl DocumentProvider for MemoryDocuments {
    fn load(&mut self, path: &Path) -> Result<LoadedDocument, DocumentError> {
        match self.files.borrow().get(path) {
            Some((content, writable)) => Ok(LoadedDocument {
                content: content.clone(),
                writable: *writable,
                ..LoadedDocument::default()
            }),
            None => Err(DocumentError::Load {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }

    fn save(&mut self, path: &Path, content: &str) -> Result<SaveReport, DocumentError> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), (content.to_string(), true));
        Ok(SaveReport {
            bytes: content.len(),
            lines: content.lines().count(),
        })
    }
}

/// Clipboard whose backend is gone.
pub struct FailingClipboard;

impl Clipboard for FailingClipboard {
    fn read(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::Unavailable("no display".into()))
    }

    fn write(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("no display".into()))
    }
}

pub fn editor_with(text: &str, settings: Settings, docs: MemoryDocuments) -> Editor {
    let mut ed = Editor::new(settings, Box::new(MemoryClipboard::new()), Box::new(docs));
    ed.state_mut()
        .replace_document(Document::new(Buffer::from_text(text)));
    ed
}

pub fn editor(text: &str) -> Editor {
    editor_with(text, Settings::default(), MemoryDocuments::default())
}

pub fn editor_lines(lines: &[&str]) -> Editor {
    editor(&lines.join("\n"))
}

/// Key event for one binding-notation token.
pub fn key(token: &str) -> KeyEvent {
    if let Some(rest) = token.strip_prefix("ctrl+") {
        let mut k = key(rest);
        k.mods |= KeyModifiers::CTRL;
        return k;
    }
    if let Some(rest) = token.strip_prefix("alt+") {
        let mut k = key(rest);
        k.mods |= KeyModifiers::ALT;
        return k;
    }
    let code = match token {
        "space" => KeyCode::Char(' '),
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => panic!("unknown key token {other:?}"),
            }
        }
    };
    KeyEvent::plain(code)
}

/// Feed keys written in binding notation (`"dd"`, `"iX esc"`, `"ctrl+r"`).
/// Returns the result of the last key.
pub fn feed(ed: &mut Editor, notation: &str) -> DispatchResult {
    let mut last = DispatchResult::clean();
    for token in parse_sequence(notation) {
        last = ed.handle_key(&key(&token));
    }
    last
}

pub fn lines(ed: &Editor) -> Vec<String> {
    ed.state()
        .document
        .buffer
        .text()
        .split('\n')
        .map(String::from)
        .collect()
}

pub fn text(ed: &Editor) -> String {
    ed.state().document.buffer.text()
}
