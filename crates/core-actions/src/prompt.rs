//! Single-line prompt used by Command and SearchPrompt modes.
//!
//! The editor hands every key to the prompt until it reports `Confirmed` or
//! `Cancelled`. Hosts may plug in their own implementation; `LineInput` is
//! the built-in one.

use core_events::{KeyCode, KeyEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Editing,
    Confirmed(String),
    Cancelled,
}

pub trait LinePrompt {
    /// Reset and show the prompt with `prefix` (`:` or `/`).
    fn begin(&mut self, prefix: char);
    fn handle_key(&mut self, key: &KeyEvent) -> PromptOutcome;
    fn prefix(&self) -> char;
    fn text(&self) -> &str;
    /// Cursor as a char index into `text`.
    fn cursor(&self) -> usize;
}

#[derive(Debug, Clone, Default)]
pub struct LineInput {
    prefix: char,
    text: String,
    cursor: usize,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn finish(&mut self, outcome: PromptOutcome) -> PromptOutcome {
        self.text.clear();
        self.cursor = 0;
        outcome
    }
}

impl LinePrompt for LineInput {
    fn begin(&mut self, prefix: char) {
        self.prefix = prefix;
        self.text.clear();
        self.cursor = 0;
    }

    fn handle_key(&mut self, key: &KeyEvent) -> PromptOutcome {
        if let Some(c) = key.printable() {
            let at = self.byte_index(self.cursor);
            self.text.insert(at, c);
            self.cursor += 1;
            return PromptOutcome::Editing;
        }
        if key.is_modified() {
            return PromptOutcome::Editing;
        }
        match key.code {
            KeyCode::Enter => {
                let text = self.text.clone();
                self.finish(PromptOutcome::Confirmed(text))
            }
            KeyCode::Esc => self.finish(PromptOutcome::Cancelled),
            // Backspace on an empty line closes the prompt, like Vim.
            KeyCode::Backspace if self.text.is_empty() => self.finish(PromptOutcome::Cancelled),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                }
                PromptOutcome::Editing
            }
            KeyCode::Delete => {
                if self.cursor < self.len() {
                    let at = self.byte_index(self.cursor);
                    self.text.remove(at);
                }
                PromptOutcome::Editing
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                PromptOutcome::Editing
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                PromptOutcome::Editing
            }
            _ => PromptOutcome::Editing,
        }
    }

    fn prefix(&self) -> char {
        self.prefix
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn cursor(&self) -> usize {
        self.cursor
    }
}
