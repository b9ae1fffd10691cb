mod common;

use common::*;
use core_actions::{DispatchResult, Editor, StatusKind};
use core_events::{KeyCode, KeyEvent};
use core_state::{Mode, Settings};
use core_text::Position;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

/// Type `:body` and confirm it.
fn command(ed: &mut Editor, body: &str) -> DispatchResult {
    ed.handle_key(&KeyEvent::char(':'));
    for c in body.chars() {
        ed.handle_key(&KeyEvent::char(c));
    }
    ed.handle_key(&KeyEvent::plain(KeyCode::Enter))
}

fn status(r: &DispatchResult) -> (StatusKind, String) {
    let m = r.status.clone().expect("status message");
    (m.kind, m.text)
}

fn opened(docs: &MemoryDocuments, path: &str) -> Editor {
    let mut ed = editor_with("", Settings::default(), docs.clone());
    ed.open(PathBuf::from(path));
    ed
}

#[test]
fn prompt_shows_typed_text_and_returns_to_normal() {
    let mut ed = editor("abc");
    feed(&mut ed, ":");
    assert_eq!(ed.mode(), Mode::Command);
    assert_eq!(ed.prompt().prefix(), ':');
    ed.handle_key(&KeyEvent::char('n'));
    assert_eq!(ed.prompt().text(), "n");
    ed.handle_key(&KeyEvent::plain(KeyCode::Esc));
    assert_eq!(ed.mode(), Mode::Normal);
}

#[test]
fn open_then_write_round_trips_through_provider() {
    let docs = MemoryDocuments::default();
    docs.insert("notes.md", "one\ntwo\n", true);
    let mut ed = opened(&docs, "notes.md");
    assert_eq!(lines(&ed), vec!["one", "two"]);
    feed(&mut ed, "x");
    assert!(ed.state().document.is_dirty());
    let r = command(&mut ed, "w");
    assert_eq!(status(&r), (StatusKind::Info, "\"notes.md\" 2L, 7B written".to_string()));
    assert_eq!(docs.get("notes.md").as_deref(), Some("ne\ntwo\n"));
    assert!(!ed.state().document.is_dirty());
    assert!(command(&mut ed, "q").quit);
}

#[test]
fn missing_file_opens_as_new_document() {
    let docs = MemoryDocuments::default();
    let mut ed = editor_with("", Settings::default(), docs.clone());
    let r = ed.open(PathBuf::from("fresh.md"));
    assert_eq!(status(&r), (StatusKind::Info, "\"fresh.md\" [New]".to_string()));
    feed(&mut ed, "i h i esc");
    command(&mut ed, "w");
    assert_eq!(docs.get("fresh.md").as_deref(), Some("hi\n"));
}

#[test]
fn quit_guards_unsaved_changes() {
    let mut ed = editor("abc");
    feed(&mut ed, "x");
    let r = command(&mut ed, "q");
    assert!(!r.quit);
    assert_eq!(status(&r).0, StatusKind::Warning);
    assert_eq!(ed.mode(), Mode::Normal);
    assert!(command(&mut ed, "q!").quit);
}

#[test]
fn write_without_name_fails_and_does_not_quit() {
    let mut ed = editor("abc");
    feed(&mut ed, "x");
    let r = command(&mut ed, "wq");
    assert!(!r.quit);
    assert_eq!(status(&r).0, StatusKind::Error);
}

#[test]
fn write_to_path_names_unnamed_document() {
    let docs = MemoryDocuments::default();
    let mut ed = editor_with("abc", Settings::default(), docs.clone());
    feed(&mut ed, "x");
    let r = command(&mut ed, "w out.md");
    assert_eq!(status(&r).0, StatusKind::Info);
    assert_eq!(docs.get("out.md").as_deref(), Some("bc\n"));
    assert_eq!(
        ed.state().document.path(),
        Some(PathBuf::from("out.md").as_path())
    );
    assert!(command(&mut ed, "x").quit);
}

#[test]
fn readonly_document_refuses_write() {
    let docs = MemoryDocuments::default();
    docs.insert("ro.md", "locked\n", false);
    let mut ed = editor_with("", Settings::default(), docs.clone());
    let r = ed.open(PathBuf::from("ro.md"));
    assert_eq!(status(&r).1, "\"ro.md\" [readonly] 1L");
    feed(&mut ed, "x");
    let r = command(&mut ed, "w");
    assert_eq!(status(&r).0, StatusKind::Error);
    assert_eq!(docs.get("ro.md").as_deref(), Some("locked\n"));
}

#[test]
fn edit_switches_documents_unless_modified() {
    let docs = MemoryDocuments::default();
    docs.insert("a.md", "alpha\n", true);
    docs.insert("b.md", "beta\n", true);
    let mut ed = opened(&docs, "a.md");
    feed(&mut ed, "x");
    let r = command(&mut ed, "e b.md");
    assert_eq!(status(&r).0, StatusKind::Warning);
    assert_eq!(text(&ed), "lpha");
    command(&mut ed, "e! b.md");
    assert_eq!(text(&ed), "beta");
    assert_eq!(ed.state().cursor(), Position::new(0, 0));
    assert!(ed.state().document.history().is_empty());
}

#[test]
fn goto_line_is_one_based_and_clamped() {
    let mut ed = editor_lines(&["a", "  b", "c"]);
    command(&mut ed, "2");
    assert_eq!(ed.state().cursor(), Position::new(1, 2));
    command(&mut ed, "99");
    assert_eq!(ed.state().cursor().row, 2);
}

#[test]
fn set_toggles_display_options() {
    let mut ed = editor("abc");
    command(&mut ed, "set nu");
    assert!(ed.state().settings.line_numbers);
    command(&mut ed, "set nonu");
    assert!(!ed.state().settings.line_numbers);
    command(&mut ed, "set nowrap");
    assert!(!ed.state().settings.wrap);
}

#[test]
fn unknown_command_is_an_error() {
    let mut ed = editor("abc");
    let r = command(&mut ed, "frobnicate");
    assert_eq!(
        status(&r),
        (StatusKind::Error, "Not an editor command: frobnicate".to_string())
    );
    assert_eq!(text(&ed), "abc");
}
