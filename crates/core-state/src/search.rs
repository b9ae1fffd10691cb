//! Incremental search over buffer lines.
//!
//! Matches are kept per row in a `BTreeMap` so forward and backward stepping
//! with wrap-around are ordered range queries. Overlapping occurrences are
//! all recorded (`"ababab"` / `"ab"` -> `[0, 2, 4]`).

use core_text::{Buffer, Position};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: Vec<char>,
    /// Last pattern confirmed from the prompt; survives `clear`.
    confirmed: String,
    case_sensitive: bool,
    matches: BTreeMap<usize, Vec<usize>>,
}

fn fold(c: char, case_sensitive: bool) -> char {
    if case_sensitive {
        c
    } else {
        c.to_lowercase().next().unwrap_or(c)
    }
}

impl SearchState {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            ..Self::default()
        }
    }

    pub fn query(&self) -> String {
        self.query.iter().collect()
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Replace the query and rebuild every match.
    pub fn set_query(&mut self, query: &str, buf: &Buffer) {
        self.query = query.chars().collect();
        self.refresh(buf);
    }

    /// Make `query` the active pattern and remember it for reuse.
    pub fn confirm(&mut self, query: &str, buf: &Buffer) {
        self.confirmed = query.to_string();
        self.set_query(query, buf);
    }

    pub fn last_confirmed(&self) -> &str {
        &self.confirmed
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool, buf: &Buffer) {
        self.case_sensitive = case_sensitive;
        self.refresh(buf);
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
    }

    /// Every start offset of the query in `line`, overlaps included.
    pub fn find_matches(&self, line: &[char]) -> Vec<usize> {
        let n = self.query.len();
        if n == 0 || line.len() < n {
            return Vec::new();
        }
        (0..=line.len() - n)
            .filter(|&start| {
                line[start..start + n]
                    .iter()
                    .zip(&self.query)
                    .all(|(&a, &b)| fold(a, self.case_sensitive) == fold(b, self.case_sensitive))
            })
            .collect()
    }

    /// Rebuild the match map against `buf`. Call after every edit while a
    /// query is active.
    pub fn refresh(&mut self, buf: &Buffer) {
        self.matches.clear();
        if self.query.is_empty() {
            return;
        }
        for (row, line) in buf.lines().enumerate() {
            let found = self.find_matches(line);
            if !found.is_empty() {
                self.matches.insert(row, found);
            }
        }
        debug!(
            target: "state.search",
            query_len = self.query.len(),
            rows = self.matches.len(),
            total = self.match_count(),
            "matches_rebuilt"
        );
    }

    pub fn match_count(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }

    pub fn matches_on(&self, row: usize) -> &[usize] {
        self.matches.get(&row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Length of a match in chars.
    pub fn match_len(&self) -> usize {
        self.query.len()
    }

    /// True when `(row, col)` falls inside any match.
    pub fn is_match_at(&self, row: usize, col: usize) -> bool {
        let n = self.query.len();
        self.matches_on(row)
            .iter()
            .any(|&start| col >= start && col < start + n)
    }

    /// Lowest (row, col) match.
    pub fn first_match(&self) -> Option<Position> {
        let (&row, cols) = self.matches.iter().next()?;
        cols.first().map(|&col| Position::new(row, col))
    }

    /// Next match after `current` (or before it when `backward`), wrapping
    /// around the buffer ends.
    pub fn find_match(&self, current: Position, backward: bool) -> Option<Position> {
        if backward {
            if let Some(&col) = self
                .matches_on(current.row)
                .iter()
                .rev()
                .find(|&&c| c < current.col)
            {
                return Some(Position::new(current.row, col));
            }
            let (&row, cols) = self
                .matches
                .range(..current.row)
                .next_back()
                .or_else(|| self.matches.iter().next_back())?;
            cols.last().map(|&col| Position::new(row, col))
        } else {
            if let Some(&col) = self
                .matches_on(current.row)
                .iter()
                .find(|&&c| c > current.col)
            {
                return Some(Position::new(current.row, col));
            }
            let (&row, cols) = self
                .matches
                .range(current.row + 1..)
                .next()
                .or_else(|| self.matches.iter().next())?;
            cols.first().map(|&col| Position::new(row, col))
        }
    }
}
