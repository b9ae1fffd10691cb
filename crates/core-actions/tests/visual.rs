mod common;

use common::*;
use core_state::{Mode, SelectionMode, Settings};
use core_text::Position;
use pretty_assertions::assert_eq;

#[test]
fn toggling_same_variant_returns_to_normal() {
    let mut ed = editor("abc");
    feed(&mut ed, "v");
    assert_eq!(ed.mode(), Mode::Visual);
    feed(&mut ed, "V");
    assert_eq!(ed.mode(), Mode::VisualLine);
    assert_eq!(ed.state().selection.mode(), SelectionMode::VisualLine);
    feed(&mut ed, "V");
    assert_eq!(ed.mode(), Mode::Normal);
    assert!(!ed.state().selection.is_active());
    feed(&mut ed, "ctrl+v");
    assert_eq!(ed.mode(), Mode::VisualBlock);
    feed(&mut ed, "esc");
    assert_eq!(ed.mode(), Mode::Normal);
}

#[test]
fn selection_follows_motions() {
    let mut ed = editor_lines(&["one two", "three"]);
    feed(&mut ed, "l v w j");
    let state = ed.state();
    assert_eq!(state.selection.anchor(), Position::new(0, 1));
    assert_eq!(
        state.selection_range(),
        Some((Position::new(0, 1), state.cursor()))
    );
    assert_eq!(state.selected_line_count(), 2);
}

#[test]
fn forward_charwise_delete_across_rows() {
    let mut ed = editor_lines(&["abcd", "efgh"]);
    feed(&mut ed, "l v j d");
    assert_eq!(lines(&ed), vec!["agh"]);
    assert_eq!(ed.mode(), Mode::Normal);
    feed(&mut ed, "u");
    assert_eq!(lines(&ed), vec!["abcd", "efgh"]);
}

#[test]
fn backward_charwise_delete_keeps_first_column() {
    let mut ed = editor_lines(&["abcd", "efgh"]);
    feed(&mut ed, "j l v k x");
    assert_eq!(lines(&ed), vec!["abgh"]);
}

#[test]
fn linewise_delete_then_paste_restores_lines() {
    let mut ed = editor_lines(&["a", "b", "c"]);
    feed(&mut ed, "j V j d");
    assert_eq!(lines(&ed), vec!["a"]);
    feed(&mut ed, "p");
    assert_eq!(lines(&ed), vec!["a", "b", "c"]);
    assert_eq!(ed.state().cursor().row, 1);
}

#[test]
fn change_deletes_and_enters_insert_as_one_step() {
    let mut ed = editor("hello world");
    feed(&mut ed, "v e c");
    assert_eq!(ed.mode(), Mode::Insert);
    assert_eq!(text(&ed), " world");
    feed(&mut ed, "H i esc");
    assert_eq!(text(&ed), "Hi world");
    feed(&mut ed, "u");
    assert_eq!(text(&ed), "hello world");
}

#[test]
fn yank_without_delay_moves_to_selection_start() {
    let settings = Settings {
        highlight_delay_ms: 0,
        ..Settings::default()
    };
    let mut ed = editor_with("abc def", settings, MemoryDocuments::default());
    feed(&mut ed, "$ v b y");
    assert_eq!(ed.mode(), Mode::Normal);
    assert_eq!(ed.state().cursor(), Position::new(0, 4));
    assert!(ed.deferred_due().is_none());
    feed(&mut ed, "P");
    assert_eq!(text(&ed), "abc defdef");
}

#[test]
fn deferred_yank_fires_when_due() {
    let mut ed = editor("abc def");
    feed(&mut ed, "w v e y");
    assert!(ed.deferred_due().is_some());
    let r = ed.fire_deferred();
    assert!(r.dirty);
    assert_eq!(ed.mode(), Mode::Normal);
    assert_eq!(ed.state().cursor(), Position::new(0, 4));
}

#[test]
fn swap_ends_then_extend() {
    let mut ed = editor("abcdef");
    feed(&mut ed, "l l v l l o h");
    let (min, max) = ed.state().selection_range().expect("selection");
    assert_eq!((min.col, max.col), (1, 4));
}

#[test]
fn clipboard_failure_is_reported_without_losing_text() {
    let mut ed = core_actions::Editor::new(
        Settings::default(),
        Box::new(FailingClipboard),
        Box::new(MemoryDocuments::default()),
    );
    ed.state_mut()
        .replace_document(core_state::Document::new(core_text::Buffer::from_text("abc")));
    let r = feed(&mut ed, "p");
    let status = r.status.expect("status");
    assert_eq!(status.kind, core_actions::StatusKind::Error);
    assert_eq!(text(&ed), "abc");
}
