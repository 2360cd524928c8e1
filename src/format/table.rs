use std::sync::LazyLock;

use regex::Regex;

use super::highlight::{self, DECIMAL_MARK, NULL_MARK, USING_MARK};
use crate::core::ExplainConfig;
use crate::parser::is_word_char;

static NULL_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bNULL\b").expect("valid NULL pattern"));
static USING_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bUsing ").expect("valid Using pattern"));
static ZERO_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\.00\b").expect("valid .00 pattern"));

/// Renders the tab-separated output of `mysql` in batch mode.
///
/// Every statement's result starts with its own `id ...` header row; only
/// the first one is kept and each data row gets a `[<n>]` label naming the
/// statement it belongs to.
pub struct TableFormatter<'a> {
    config: &'a ExplainConfig,
    color: bool,
}

impl<'a> TableFormatter<'a> {
    /// `color` is the already-resolved decision (see `ColorMode::enabled`)
    pub const fn new(config: &'a ExplainConfig, color: bool) -> Self {
        Self { config, color }
    }

    pub fn format(&self, response: &str) -> String {
        let rows = self.collect_rows(response);
        let mut table = align_rows(&rows);

        if self.config.compact {
            table = format!("{}\n\n{table}", legend());
        }

        if self.color {
            highlight::colorize(&table, &self.config.ban)
        } else {
            highlight::plain(&table)
        }
    }

    fn collect_rows(&self, response: &str) -> Vec<Vec<String>> {
        let mut block: i64 = -1;
        let mut rows = Vec::new();

        for line in response.lines() {
            if is_header(line) {
                block += 1;
                if block == 0 {
                    rows.push(self.header_row(line));
                }
                continue;
            }
            rows.push(self.data_row(line, block));
        }

        rows
    }

    fn header_row(&self, line: &str) -> Vec<String> {
        let mut row = vec![String::new()];
        row.extend(split_cells(line).into_iter().map(|cell| {
            if self.config.compact {
                abbreviate(&cell).map_or(cell, str::to_string)
            } else {
                cell
            }
        }));
        row
    }

    fn data_row(&self, line: &str, block: i64) -> Vec<String> {
        let mut row = vec![format!("[{block}]")];
        if self.config.compact {
            row.extend(split_cells(&compact_line(line)));
        } else {
            row.extend(split_cells(line));
        }
        row
    }
}

/// `id` followed by a non-word character or the end of line
fn is_header(line: &str) -> bool {
    line.strip_prefix("id")
        .is_some_and(|rest| rest.chars().next().is_none_or(|c| !is_word_char(c)))
}

fn abbreviate(column: &str) -> Option<&'static str> {
    match column {
        "id" => Some("#"),
        "select_type" => Some("sel."),
        "partitions" => Some("p."),
        "key_len" => Some("k."),
        "filtered" => Some("f."),
        _ => None,
    }
}

fn legend() -> String {
    format!(
        "#: id, sel.: select_type, p.: partitions, k.: key_len, f.: filtered; \
         {NULL_MARK}: NULL, {USING_MARK}: Using, {DECIMAL_MARK}: .00"
    )
}

fn compact_line(line: &str) -> String {
    let line = NULL_WORD.replace_all(line, NULL_MARK);
    let line = USING_WORD.replace_all(&line, USING_MARK);
    ZERO_FRACTION.replace_all(&line, DECIMAL_MARK).into_owned()
}

/// Tab split; trailing empty cells are dropped
fn split_cells(line: &str) -> Vec<String> {
    let mut cells: Vec<String> = line.split('\t').map(str::to_string).collect();
    while cells.last().is_some_and(String::is_empty) {
        cells.pop();
    }
    cells
}

/// Left-justify every cell to its column's widest cell. Rows may be ragged;
/// missing cells are simply not printed.
fn align_rows(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(" ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
