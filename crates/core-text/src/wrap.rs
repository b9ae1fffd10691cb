//! Display-row geometry for soft-wrapped lines.
//!
//! A logical line is split into sub-rows no wider than the wrap width, measured
//! in terminal cells. A character wider than the whole width still gets a row
//! of its own so every sub-row holds at least one code point.

use unicode_width::UnicodeWidthChar;

/// Terminal cell width of a single code point. Control characters count as one.
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(1)
}

/// Start column of every display sub-row of `line`. Always non-empty; the
/// first entry is 0. A `width` of 0 disables wrapping.
pub fn row_starts(line: &[char], width: usize) -> Vec<usize> {
    let mut starts = vec![0];
    if width == 0 {
        return starts;
    }
    let mut used = 0usize;
    for (i, c) in line.iter().enumerate() {
        let w = char_width(*c);
        if used > 0 && used + w > width {
            starts.push(i);
            used = 0;
        }
        used += w;
    }
    starts
}

/// Index into `starts` of the sub-row containing `col`.
pub fn sub_row_index(starts: &[usize], col: usize) -> usize {
    starts.iter().rposition(|&s| s <= col).unwrap_or(0)
}

/// Sub-row holding `col` (a column equal to the line length belongs to the last sub-row).
pub fn sub_row_of(line: &[char], col: usize, width: usize) -> usize {
    sub_row_index(&row_starts(line, width), col)
}

/// Half-open column range `[start, end)` of sub-row `sub`.
pub fn sub_row_bounds(line: &[char], sub: usize, width: usize) -> (usize, usize) {
    let starts = row_starts(line, width);
    let sub = sub.min(starts.len() - 1);
    let end = starts.get(sub + 1).copied().unwrap_or(line.len());
    (starts[sub], end)
}

/// Slices of `line`, one per display sub-row.
pub fn split_rows(line: &[char], width: usize) -> Vec<&[char]> {
    let starts = row_starts(line, width);
    starts
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let end = starts.get(i + 1).copied().unwrap_or(line.len());
            &line[s..end]
        })
        .collect()
}
