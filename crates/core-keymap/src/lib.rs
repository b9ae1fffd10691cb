//! core-keymap: chord dispatcher.
//!
//! Pressed keys accumulate into a [`KeySequence`]. After every key the
//! accumulated sequence is resolved against the registered bindings:
//!
//! 1. exact match for the current mode with a focused panel -> fire, reset;
//! 2. known prefix of a longer binding for the current mode -> keep waiting;
//! 3. anything else -> reset without firing.
//!
//! Prefixes are precomputed per mode for the panels focused *right now* and
//! must be rebuilt through [`Keymap::refresh_focus`] on every focus change, so
//! a chord begun in one panel never continues in another. Chords have no
//! timeout.
//!
//! The keymap is generic over the mode type `M` and handler type `H` and only
//! learns about panels through the [`Focus`] capability.

use core_events::KeyEvent;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;
use tracing::{debug, trace};

/// Focus query implemented by every panel a binding can address.
pub trait Focus {
    fn focused(&self) -> bool;
}

pub type PanelRef = Rc<dyn Focus>;

/// Multi-character key names that form a single token in binding notation.
const NAMED_KEYS: &[&str] = &[
    "space",
    "enter",
    "esc",
    "backspace",
    "delete",
    "tab",
    "up",
    "down",
    "left",
    "right",
];

/// Split binding notation into key tokens.
///
/// Whitespace separates words; a word that is a named key or carries a
/// `ctrl+`/`alt+` prefix is one token, any other word is one token per
/// character. `"dd"`, `"d d"` and `"ctrl+w l"` all parse as expected.
pub fn parse_sequence(notation: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for word in notation.split_whitespace() {
        if NAMED_KEYS.contains(&word) || word.starts_with("ctrl+") || word.starts_with("alt+") {
            tokens.push(word.to_string());
        } else {
            tokens.extend(word.chars().map(String::from));
        }
    }
    tokens
}

/// Canonical string for a token list: single-character tokens are
/// concatenated, and a space separates any pair where either side is a
/// multi-character token (every modified key is one).
pub fn canonical<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::new();
    let mut prev_long = false;
    for (i, t) in tokens.iter().enumerate() {
        let t = t.as_ref();
        let long = t.chars().count() > 1;
        if i > 0 && (long || prev_long) {
            out.push(' ');
        }
        out.push_str(t);
        prev_long = long;
    }
    out
}

/// Keys pressed so far for the chord in progress.
#[derive(Debug, Default, Clone)]
pub struct KeySequence {
    tokens: SmallVec<[String; 4]>,
    text: String,
}

impl KeySequence {
    pub fn push(&mut self, key: &KeyEvent) {
        self.tokens.push(key.token());
        self.text = canonical(&self.tokens);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.text.clear();
    }
}

/// One (mode, panels, handler) alternative of a binding.
pub struct Condition<M, H> {
    pub mode: M,
    pub panels: SmallVec<[PanelRef; 2]>,
    pub handler: H,
}

impl<M: PartialEq, H> Condition<M, H> {
    fn has_focus(&self) -> bool {
        self.panels.iter().any(|p| p.focused())
    }

    fn matches(&self, mode: &M) -> bool {
        self.mode == *mode && self.has_focus()
    }
}

/// One or more key sequences sharing a list of conditions.
pub struct Binding<M, H> {
    sequences: SmallVec<[Vec<String>; 2]>,
    conditions: Vec<Condition<M, H>>,
}

impl<M, H> Binding<M, H> {
    /// Sequences are given in binding notation (see [`parse_sequence`]).
    pub fn new<I, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            sequences: sequences
                .into_iter()
                .map(|s| parse_sequence(s.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
            conditions: Vec::new(),
        }
    }

    /// Add a condition: fire `handler` in `mode` when any of `panels` is focused.
    pub fn when(mut self, mode: M, panels: &[PanelRef], handler: H) -> Self {
        self.conditions.push(Condition {
            mode,
            panels: panels.iter().cloned().collect(),
            handler,
        });
        self
    }

    fn canonical_sequences(&self) -> impl Iterator<Item = String> + '_ {
        self.sequences.iter().map(|t| canonical(t))
    }
}

/// What a single key did to the chord in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<H> {
    /// The sequence matched; it has been reset.
    Fired(H),
    /// The sequence is a known prefix; waiting for more keys.
    Pending,
    /// Nothing matched and the sequence was reset. `chord` is true when keys
    /// before this one were already pending.
    Unmatched { sequence: String, chord: bool },
}

pub struct Keymap<M, H> {
    bindings: Vec<Binding<M, H>>,
    /// Canonical sequence -> indices of bindings declaring it.
    exact: HashMap<String, SmallVec<[usize; 2]>>,
    /// Per-mode proper prefixes reachable from focused panels.
    prefixes: HashMap<M, HashSet<String>>,
    sequence: KeySequence,
}

impl<M, H> Keymap<M, H>
where
    M: Copy + Eq + Hash + Debug,
    H: Clone,
{
    pub fn new(bindings: Vec<Binding<M, H>>) -> Self {
        let mut keymap = Self {
            bindings: Vec::new(),
            exact: HashMap::new(),
            prefixes: HashMap::new(),
            sequence: KeySequence::default(),
        };
        for binding in bindings {
            keymap.insert(binding);
        }
        keymap.refresh_focus();
        keymap
    }

    /// Register an additional binding; prefixes are rebuilt immediately.
    pub fn bind(&mut self, binding: Binding<M, H>) {
        self.insert(binding);
        self.refresh_focus();
    }

    fn insert(&mut self, binding: Binding<M, H>) {
        let idx = self.bindings.len();
        for seq in binding.canonical_sequences() {
            self.exact.entry(seq).or_default().push(idx);
        }
        self.bindings.push(binding);
    }

    /// Rebuild the prefix map for the currently focused panels and drop any
    /// chord in progress.
    pub fn refresh_focus(&mut self) {
        self.prefixes.clear();
        for binding in &self.bindings {
            for cond in binding.conditions.iter().filter(|c| c.has_focus()) {
                let set = self.prefixes.entry(cond.mode).or_default();
                for tokens in &binding.sequences {
                    for k in 1..tokens.len() {
                        set.insert(canonical(&tokens[..k]));
                    }
                }
            }
        }
        self.sequence.clear();
        debug!(
            target: "keymap",
            modes = self.prefixes.len(),
            prefixes = self.prefixes.values().map(HashSet::len).sum::<usize>(),
            "prefix_map_rebuilt"
        );
    }

    /// Feed one key pressed while in `mode`.
    pub fn feed(&mut self, key: &KeyEvent, mode: M) -> Outcome<H> {
        let chord = !self.sequence.is_empty();
        self.sequence.push(key);
        if let Some(handler) = self.lookup(self.sequence.as_str(), mode) {
            trace!(target: "keymap", sequence = self.sequence.as_str(), ?mode, "fired");
            self.sequence.clear();
            return Outcome::Fired(handler);
        }
        if self.is_prefix(self.sequence.as_str(), mode) {
            trace!(target: "keymap", sequence = self.sequence.as_str(), ?mode, "pending");
            return Outcome::Pending;
        }
        let sequence = self.sequence.as_str().to_string();
        trace!(target: "keymap", sequence = sequence.as_str(), ?mode, "unmatched");
        self.sequence.clear();
        Outcome::Unmatched { sequence, chord }
    }

    /// Handler bound to `sequence` for `mode` with a focused panel.
    pub fn lookup(&self, sequence: &str, mode: M) -> Option<H> {
        self.exact
            .get(sequence)?
            .iter()
            .flat_map(|&i| self.bindings[i].conditions.iter())
            .find(|c| c.matches(&mode))
            .map(|c| c.handler.clone())
    }

    pub fn is_prefix(&self, sequence: &str, mode: M) -> bool {
        self.prefixes
            .get(&mode)
            .is_some_and(|set| set.contains(sequence))
    }

    /// Chord in progress (empty when idle).
    pub fn pending(&self) -> &str {
        self.sequence.as_str()
    }

    /// Abort the chord in progress.
    pub fn cancel(&mut self) {
        self.sequence.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Mode {
        Normal,
        Visual,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Act {
        DeleteLine,
        DeleteSelection,
        Top,
        Redo,
        WindowLeft,
        ListDown,
    }

    struct Panel(Cell<bool>);

    impl Focus for Panel {
        fn focused(&self) -> bool {
            self.0.get()
        }
    }

    fn panel(focused: bool) -> Rc<Panel> {
        Rc::new(Panel(Cell::new(focused)))
    }

    fn keymap(editor: &Rc<Panel>, list: &Rc<Panel>) -> Keymap<Mode, Act> {
        let editor: PanelRef = editor.clone();
        let list: PanelRef = list.clone();
        Keymap::new(vec![
            Binding::new(["dd"]).when(Mode::Normal, &[editor.clone()], Act::DeleteLine),
            Binding::new(["d", "x"]).when(Mode::Visual, &[editor.clone()], Act::DeleteSelection),
            Binding::new(["gg"]).when(Mode::Normal, &[editor.clone(), list.clone()], Act::Top),
            Binding::new(["ctrl+r"]).when(Mode::Normal, &[editor.clone()], Act::Redo),
            Binding::new(["ctrl+w h"]).when(Mode::Normal, &[editor.clone()], Act::WindowLeft),
            Binding::new(["j", "down"]).when(Mode::Normal, &[list], Act::ListDown),
        ])
    }

    fn k(c: char) -> KeyEvent {
        KeyEvent::char(c)
    }

    #[test]
    fn parse_and_canonical_forms() {
        assert_eq!(parse_sequence("dd"), vec!["d", "d"]);
        assert_eq!(parse_sequence("ctrl+w h"), vec!["ctrl+w", "h"]);
        assert_eq!(parse_sequence("esc"), vec!["esc"]);
        assert_eq!(canonical(&["d", "d"]), "dd");
        assert_eq!(canonical(&["ctrl+w", "h"]), "ctrl+w h");
        assert_eq!(canonical(&["d", "esc"]), "d esc");
    }

    #[test]
    fn sequence_separates_modified_keys() {
        let mut seq = KeySequence::default();
        seq.push(&KeyEvent::ctrl('w'));
        seq.push(&KeyEvent::ctrl('l'));
        assert_eq!(seq.as_str(), "ctrl+w ctrl+l");
        seq.clear();
        seq.push(&k('g'));
        seq.push(&k('g'));
        assert_eq!(seq.as_str(), "gg");
    }

    #[test]
    fn delete_line_fires_only_after_second_key() {
        let (editor, list) = (panel(true), panel(false));
        let mut km = keymap(&editor, &list);
        assert_eq!(km.feed(&k('d'), Mode::Normal), Outcome::Pending);
        assert_eq!(km.pending(), "d");
        assert_eq!(km.feed(&k('d'), Mode::Normal), Outcome::Fired(Act::DeleteLine));
        assert_eq!(km.pending(), "");
    }

    #[test]
    fn prefix_in_one_mode_is_exact_in_another() {
        let (editor, list) = (panel(true), panel(false));
        let mut km = keymap(&editor, &list);
        assert_eq!(km.feed(&k('d'), Mode::Visual), Outcome::Fired(Act::DeleteSelection));
    }

    #[test]
    fn unmatched_key_resets_without_firing() {
        let (editor, list) = (panel(true), panel(false));
        let mut km = keymap(&editor, &list);
        assert_eq!(km.feed(&k('d'), Mode::Normal), Outcome::Pending);
        assert_eq!(
            km.feed(&KeyEvent::plain(KeyCode::Esc), Mode::Normal),
            Outcome::Unmatched {
                sequence: "d esc".to_string(),
                chord: true
            }
        );
        assert_eq!(km.pending(), "");
        assert_eq!(
            km.feed(&k('q'), Mode::Normal),
            Outcome::Unmatched {
                sequence: "q".to_string(),
                chord: false
            }
        );
    }

    #[test]
    fn modified_chords_resolve() {
        let (editor, list) = (panel(true), panel(false));
        let mut km = keymap(&editor, &list);
        assert_eq!(km.feed(&KeyEvent::ctrl('r'), Mode::Normal), Outcome::Fired(Act::Redo));
        assert_eq!(km.feed(&KeyEvent::ctrl('w'), Mode::Normal), Outcome::Pending);
        assert_eq!(km.feed(&k('h'), Mode::Normal), Outcome::Fired(Act::WindowLeft));
    }

    #[test]
    fn unfocused_panel_bindings_do_not_fire() {
        let (editor, list) = (panel(true), panel(false));
        let mut km = keymap(&editor, &list);
        assert!(matches!(km.feed(&k('j'), Mode::Normal), Outcome::Unmatched { .. }));
        editor.0.set(false);
        list.0.set(true);
        km.refresh_focus();
        assert_eq!(km.feed(&k('j'), Mode::Normal), Outcome::Fired(Act::ListDown));
        assert_eq!(
            km.feed(&KeyEvent::plain(KeyCode::Down), Mode::Normal),
            Outcome::Fired(Act::ListDown)
        );
    }

    #[test]
    fn prefixes_follow_focus() {
        let (editor, list) = (panel(true), panel(false));
        let mut km = keymap(&editor, &list);
        assert!(km.is_prefix("d", Mode::Normal));
        assert!(km.is_prefix("g", Mode::Normal));
        editor.0.set(false);
        list.0.set(true);
        km.refresh_focus();
        assert!(!km.is_prefix("d", Mode::Normal));
        assert!(km.is_prefix("g", Mode::Normal));
        assert_eq!(km.feed(&k('g'), Mode::Normal), Outcome::Pending);
        assert_eq!(km.feed(&k('g'), Mode::Normal), Outcome::Fired(Act::Top));
    }

    #[test]
    fn focus_change_drops_pending_chord() {
        let (editor, list) = (panel(true), panel(false));
        let mut km = keymap(&editor, &list);
        assert_eq!(km.feed(&k('g'), Mode::Normal), Outcome::Pending);
        km.refresh_focus();
        assert_eq!(km.pending(), "");
        assert_eq!(km.feed(&k('g'), Mode::Normal), Outcome::Pending);
    }

    #[test]
    fn shift_is_folded_into_the_character() {
        let (editor, list) = (panel(true), panel(false));
        let mut km = keymap(&editor, &list);
        km.bind(Binding::new(["G"]).when(Mode::Normal, &[editor.clone() as PanelRef], Act::Top));
        let shifted = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(km.feed(&shifted, Mode::Normal), Outcome::Fired(Act::Top));
    }
}
