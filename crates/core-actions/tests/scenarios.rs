mod common;

use common::*;
use core_state::Mode;
use core_text::Position;
use pretty_assertions::assert_eq;

#[test]
fn yank_line_then_paste_below_last_row() {
    let mut ed = editor_lines(&["TEST1", "Test2", "Test3"]);
    feed(&mut ed, "V y");
    feed(&mut ed, "j j p");
    assert_eq!(lines(&ed), vec!["TEST1", "Test2", "Test3", "TEST1"]);
    assert_eq!(ed.state().cursor().row, 3);
    assert_eq!(ed.mode(), Mode::Normal);
}

#[test]
fn insert_is_one_undo_step() {
    let mut ed = editor("ab");
    feed(&mut ed, "i X esc");
    assert_eq!(text(&ed), "Xab");
    assert_eq!(ed.state().cursor(), Position::new(0, 1));
    assert_eq!(ed.state().document.history().len(), 1);
    feed(&mut ed, "u");
    assert_eq!(text(&ed), "ab");
    assert_eq!(ed.state().cursor(), Position::new(0, 0));
    feed(&mut ed, "ctrl+r");
    assert_eq!(text(&ed), "Xab");
    assert_eq!(ed.state().cursor(), Position::new(0, 1));
}

#[test]
fn redo_of_delete_line_lands_on_first_non_blank() {
    let mut ed = editor_lines(&["one", "  two"]);
    feed(&mut ed, "d d");
    assert_eq!(lines(&ed), vec!["  two"]);
    let after_delete = ed.state().cursor();
    assert_eq!(after_delete, Position::new(0, 2));
    feed(&mut ed, "u");
    assert_eq!(lines(&ed), vec!["one", "  two"]);
    assert_eq!(ed.state().cursor(), Position::new(0, 0));
    feed(&mut ed, "ctrl+r");
    assert_eq!(lines(&ed), vec!["  two"]);
    assert_eq!(ed.state().cursor(), after_delete);
}

#[test]
fn delete_line_fires_on_second_key_only() {
    let mut ed = editor_lines(&["one", "two"]);
    let first = feed(&mut ed, "d");
    assert!(!first.quit);
    assert_eq!(ed.pending_keys(), "d");
    assert_eq!(lines(&ed), vec!["one", "two"]);
    feed(&mut ed, "d");
    assert_eq!(lines(&ed), vec!["two"]);
    assert_eq!(ed.pending_keys(), "");
}

#[test]
fn cancel_key_aborts_pending_chord() {
    let mut ed = editor_lines(&["one", "two"]);
    feed(&mut ed, "d esc d");
    assert_eq!(lines(&ed), vec!["one", "two"]);
    assert_eq!(ed.pending_keys(), "d");
}

#[test]
fn typing_multiple_lines_and_leaving_insert() {
    let mut ed = editor("");
    feed(&mut ed, "i h i enter t h e r e esc");
    assert_eq!(lines(&ed), vec!["hi", "there"]);
    assert_eq!(ed.state().cursor(), Position::new(1, 4));
    feed(&mut ed, "u");
    assert_eq!(text(&ed), "");
}

#[test]
fn append_and_open_lines() {
    let mut ed = editor("ab");
    feed(&mut ed, "a X esc");
    assert_eq!(text(&ed), "aXb");
    feed(&mut ed, "A Y esc");
    assert_eq!(text(&ed), "aXbY");
    feed(&mut ed, "o n esc O p esc");
    assert_eq!(lines(&ed), vec!["aXbY", "p", "n"]);
    feed(&mut ed, "u u");
    assert_eq!(lines(&ed), vec!["aXbY"]);
}

#[test]
fn normal_mode_edits_undo_individually() {
    let mut ed = editor("hello world");
    feed(&mut ed, "x x");
    assert_eq!(text(&ed), "llo world");
    feed(&mut ed, "w D");
    assert_eq!(text(&ed), "llo ");
    feed(&mut ed, "u");
    assert_eq!(text(&ed), "llo world");
    feed(&mut ed, "u u");
    assert_eq!(text(&ed), "hello world");
    let r = feed(&mut ed, "u");
    assert!(!r.dirty);
}
