//! Final rendering of an aligned plan table: either plain text or ANSI colors.
//!
//! Compact mode leaves marks in the table in place of `NULL`, `Using ` and
//! `.00`; both renderers turn them into their short glyphs.
use regex::Regex;

use crate::parser::is_word_char;

/// Stands for `NULL`. Two characters wide, like its glyph `--`
pub const NULL_MARK: &str = "\u{E000}\u{E000}";
/// Stands for `Using `, rendered as `U`
pub const USING_MARK: &str = "\u{E001}";
/// Stands for `.00`, rendered as `/`
pub const DECIMAL_MARK: &str = "\u{E002}";

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    /// Ban pattern matches
    pub const ALERT: &str = "\x1b[1;31m";
    /// Compacted `NULL` / `.00`
    pub const DIM: &str = "\x1b[90m";
    /// Compacted `Using`, chosen key
    pub const ACCENT: &str = "\x1b[36m";
}

use colors::{ACCENT, ALERT, DIM, RESET};

pub fn plain(table: &str) -> String {
    table
        .replace(NULL_MARK, "--")
        .replace(USING_MARK, "U")
        .replace(DECIMAL_MARK, "/")
}

pub fn colorize(table: &str, ban: &Regex) -> String {
    let flagged = ban.replace_all(table, format!("{ALERT}${{0}}{RESET}"));
    let expanded = flagged
        .replace(NULL_MARK, &format!("{DIM}--{RESET}"))
        .replace(USING_MARK, &format!("{ACCENT}U{RESET}"))
        .replace(DECIMAL_MARK, &format!("{DIM}/{RESET}"));

    expanded
        .split('\n')
        .map(highlight_chosen_key)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Color the word of the 7th space-separated field (`possible_keys`, after
/// the row label) that the 8th field (`key`) starts with.
fn highlight_chosen_key(line: &str) -> String {
    match chosen_key_span(line) {
        Some((start, end)) => format!(
            "{}{ACCENT}{}{RESET}{}",
            &line[..start],
            &line[start..end],
            &line[end..]
        ),
        None => line.to_string(),
    }
}

const fn is_word_byte(b: u8) -> bool {
    is_word_char(b as char)
}

/// Byte range of the highlighted word, if any. Rightmost candidate wins.
fn chosen_key_span(line: &str) -> Option<(usize, usize)> {
    if line.is_empty() || line.starts_with(' ') {
        return None;
    }

    let mut fields: Vec<(usize, usize)> = Vec::with_capacity(8);
    let mut start = None;
    for (i, c) in line.char_indices() {
        if c == ' ' {
            if let Some(s) = start.take() {
                fields.push((s, i));
                if fields.len() == 8 {
                    break;
                }
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        fields.push((s, line.len()));
    }
    if fields.len() < 8 {
        return None;
    }

    let (offset, field_end) = fields[6];
    let field = &line.as_bytes()[offset..field_end];
    let key = &line.as_bytes()[fields[7].0..fields[7].1];

    for p in (0..field.len()).rev() {
        if !is_word_byte(field[p]) || (p > 0 && is_word_byte(field[p - 1])) {
            continue;
        }
        let len = field[p..].iter().take_while(|b| is_word_byte(**b)).count();
        let word = &field[p..p + len];
        if key.starts_with(word) && !key.get(len).copied().is_some_and(is_word_byte) {
            return Some((offset + p, offset + p + len));
        }
    }

    None
}
