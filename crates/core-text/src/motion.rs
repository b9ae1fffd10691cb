//! Cursor motions over a `Buffer` + `Position` pair.
//!
//! Every motion returns `true` when the cursor moved. A motion that cannot
//! move (buffer start/end, failed character search) leaves the position
//! untouched and returns `false`; callers treat that as a silent no-op.
//!
//! `overshoot` selects the column limit: `len` for insert contexts, `len - 1`
//! for normal/visual contexts where the cursor rests on a character.

use crate::{Buffer, Position, wrap};

/// Highest column the cursor may occupy on a line of `len` code points.
pub fn col_limit(len: usize, overshoot: bool) -> usize {
    if overshoot { len } else { len.saturating_sub(1) }
}

/// Word characters are letters; a word is a maximal run of them.
pub fn is_word(c: char) -> bool {
    c.is_alphabetic()
}

pub fn character_left(buf: &Buffer, pos: &mut Position) -> bool {
    if pos.col == 0 {
        return false;
    }
    pos.col -= 1;
    buf.sync_row_offset(pos);
    true
}

pub fn character_right(buf: &Buffer, pos: &mut Position, overshoot: bool) -> bool {
    if pos.col >= col_limit(buf.line_len(pos.row), overshoot) {
        return false;
    }
    pos.col += 1;
    buf.sync_row_offset(pos);
    true
}

pub fn line_start(buf: &Buffer, pos: &mut Position) -> bool {
    let moved = pos.col != 0;
    pos.col = 0;
    buf.sync_row_offset(pos);
    moved
}

pub fn line_end(buf: &Buffer, pos: &mut Position, overshoot: bool) -> bool {
    let target = col_limit(buf.line_len(pos.row), overshoot);
    let moved = pos.col != target;
    pos.col = target;
    buf.sync_row_offset(pos);
    moved
}

/// First non-whitespace column, or the line end when the line is blank.
pub fn first_non_blank(buf: &Buffer, pos: &mut Position) -> bool {
    let Some(line) = buf.line(pos.row) else {
        return false;
    };
    let target = line
        .iter()
        .position(|c| !c.is_whitespace())
        .unwrap_or_else(|| col_limit(line.len(), false));
    let moved = pos.col != target;
    pos.col = target;
    buf.sync_row_offset(pos);
    moved
}

pub fn buffer_start(buf: &Buffer, pos: &mut Position) -> bool {
    let moved = pos.row != 0 || pos.col != 0;
    pos.row = 0;
    pos.col = 0;
    buf.sync_row_offset(pos);
    moved
}

pub fn buffer_end(buf: &Buffer, pos: &mut Position) -> bool {
    let last = buf.line_count() - 1;
    let moved = pos.row != last || pos.col != 0;
    pos.row = last;
    pos.col = 0;
    buf.sync_row_offset(pos);
    moved
}

/// Column inside the sub-row `[start, end)` matching `offset`, clamped to the
/// last reachable column of that sub-row.
fn land(start: usize, end: usize, offset: usize, len: usize, overshoot: bool) -> usize {
    let last = if end >= len {
        col_limit(len, overshoot)
    } else {
        end - 1
    };
    (start + offset).min(last)
}

/// Move one display row down: the next wrapped sub-row of the same line when
/// there is one, otherwise the first sub-row of the next line.
pub fn down(buf: &Buffer, pos: &mut Position, overshoot: bool) -> bool {
    let Some(line) = buf.line(pos.row) else {
        return false;
    };
    let width = buf.wrap_width();
    let starts = wrap::row_starts(line, width);
    let sub = wrap::sub_row_index(&starts, pos.col);
    let offset = pos.col - starts[sub];
    if sub + 1 < starts.len() {
        let end = starts.get(sub + 2).copied().unwrap_or(line.len());
        pos.col = land(starts[sub + 1], end, offset, line.len(), overshoot);
    } else if pos.row + 1 < buf.line_count() {
        pos.row += 1;
        let next = buf.line(pos.row).unwrap_or_default();
        let (start, end) = wrap::sub_row_bounds(next, 0, width);
        pos.col = land(start, end, offset, next.len(), overshoot);
    } else {
        return false;
    }
    buf.sync_row_offset(pos);
    true
}

/// Move one display row up; mirror of [`down`].
pub fn up(buf: &Buffer, pos: &mut Position, overshoot: bool) -> bool {
    let Some(line) = buf.line(pos.row) else {
        return false;
    };
    let width = buf.wrap_width();
    let starts = wrap::row_starts(line, width);
    let sub = wrap::sub_row_index(&starts, pos.col);
    let offset = pos.col - starts[sub];
    if sub > 0 {
        pos.col = land(starts[sub - 1], starts[sub], offset, line.len(), overshoot);
    } else if pos.row > 0 {
        pos.row -= 1;
        let prev = buf.line(pos.row).unwrap_or_default();
        let last_sub = wrap::row_starts(prev, width).len() - 1;
        let (start, end) = wrap::sub_row_bounds(prev, last_sub, width);
        pos.col = land(start, end, offset, prev.len(), overshoot);
    } else {
        return false;
    }
    buf.sync_row_offset(pos);
    true
}

/// Jump to the start of the next word. Reaching a line end continues on the
/// next line at column 0; an empty line is a stop of its own.
pub fn word_right(buf: &Buffer, pos: &mut Position) -> bool {
    let mut row = pos.row;
    let mut col = pos.col;
    let Some(mut line) = buf.line(row) else {
        return false;
    };
    while col < line.len() && is_word(line[col]) {
        col += 1;
    }
    loop {
        while col < line.len() && !is_word(line[col]) {
            col += 1;
        }
        if col < line.len() {
            break;
        }
        if row + 1 >= buf.line_count() {
            return false;
        }
        row += 1;
        col = 0;
        line = buf.line(row).unwrap_or_default();
        if line.is_empty() {
            break;
        }
    }
    pos.row = row;
    pos.col = col;
    buf.sync_row_offset(pos);
    true
}

/// Jump to the last character of the current or next word.
pub fn word_right_end(buf: &Buffer, pos: &mut Position) -> bool {
    let mut row = pos.row;
    let mut col = pos.col + 1;
    let mut line = buf.line(row).unwrap_or_default();
    loop {
        while col < line.len() && !is_word(line[col]) {
            col += 1;
        }
        if col < line.len() {
            break;
        }
        if row + 1 >= buf.line_count() {
            return false;
        }
        row += 1;
        col = 0;
        line = buf.line(row).unwrap_or_default();
    }
    while col + 1 < line.len() && is_word(line[col + 1]) {
        col += 1;
    }
    pos.row = row;
    pos.col = col;
    buf.sync_row_offset(pos);
    true
}

/// Jump to the start of the current word, or of the previous word when the
/// cursor already sits on a word start. Crosses line starts; stops on empty lines.
pub fn word_left(buf: &Buffer, pos: &mut Position) -> bool {
    let mut row = pos.row;
    let mut col = pos.col;
    loop {
        let line = buf.line(row).unwrap_or_default();
        let mut c = col.min(line.len());
        while c > 0 && !is_word(line[c - 1]) {
            c -= 1;
        }
        if c > 0 {
            while c > 0 && is_word(line[c - 1]) {
                c -= 1;
            }
            col = c;
            break;
        }
        if row == 0 {
            col = 0;
            break;
        }
        row -= 1;
        col = buf.line_len(row);
        if col == 0 {
            break;
        }
    }
    if row == pos.row && col == pos.col {
        return false;
    }
    pos.row = row;
    pos.col = col;
    buf.sync_row_offset(pos);
    true
}

/// Scan the current line from the cursor (exclusive) for `target`. On failure
/// the cursor is not touched.
pub fn find_character(buf: &Buffer, pos: &mut Position, target: char, backward: bool) -> bool {
    let Some(line) = buf.line(pos.row) else {
        return false;
    };
    let found = if backward {
        line[..pos.col.min(line.len())]
            .iter()
            .rposition(|&c| c == target)
    } else {
        line.iter()
            .enumerate()
            .skip(pos.col + 1)
            .find(|(_, c)| **c == target)
            .map(|(i, _)| i)
    };
    match found {
        Some(col) => {
            pos.col = col;
            buf.sync_row_offset(pos);
            true
        }
        None => false,
    }
}

pub fn is_at_line_start(pos: &Position) -> bool {
    pos.col == 0
}

/// True when the cursor is on (or past) the last character of its line.
pub fn is_at_line_end(buf: &Buffer, pos: &Position) -> bool {
    pos.col + 1 >= buf.line_len(pos.row)
}

/// True when the cursor sits past the last character a normal-mode cursor may
/// occupy. Clamps `pos.row` into the buffer first.
pub fn is_exceeding_line(buf: &Buffer, pos: &mut Position) -> bool {
    if pos.row >= buf.line_count() {
        pos.row = buf.line_count() - 1;
    }
    pos.col > col_limit(buf.line_len(pos.row), false)
}

/// Clamp both coordinates into the buffer for the given context.
pub fn clamp(buf: &Buffer, pos: &mut Position, overshoot: bool) {
    if pos.row >= buf.line_count() {
        pos.row = buf.line_count() - 1;
    }
    pos.col = pos.col.min(col_limit(buf.line_len(pos.row), overshoot));
    buf.sync_row_offset(pos);
}
