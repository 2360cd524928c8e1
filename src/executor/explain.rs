/// EXPLAIN query builder
///
/// Turns `mysqldumpslow` output into one `EXPLAIN <stmt>;` line per entry:
/// - entries are separated by empty lines and must start with a `Count` header
/// - placeholders are filled by `PlaceholderResolver` using the entry's row index
/// - whitespace runs inside a statement collapse to single spaces
use std::io::{self, Write};

use tracing::debug;

use super::resolver::PlaceholderResolver;
use crate::core::{ExplainConfig, SetsumeiError};
use crate::parser::parse_entries;

pub struct ExplainBuilder<'a> {
    resolver: PlaceholderResolver<'a>,
}

/// Statements ready to be sent to the database client, in log order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainBatch {
    statements: Vec<String>,
}

impl<'a> ExplainBuilder<'a> {
    pub const fn new(config: &'a ExplainConfig) -> Self {
        Self {
            resolver: PlaceholderResolver::new(config),
        }
    }

    pub fn build(&self, raw_log: &str) -> Result<ExplainBatch, SetsumeiError> {
        let entries = parse_entries(raw_log)?;

        let statements: Vec<String> = entries
            .iter()
            .enumerate()
            .map(|(row, entry)| {
                let resolved = self.resolver.resolve(&entry.statement(), row);
                explain_statement(&resolved)
            })
            .collect();

        if statements.is_empty() {
            return Err(SetsumeiError::EmptyLog);
        }

        debug!(count = statements.len(), "built EXPLAIN statements");
        Ok(ExplainBatch { statements })
    }
}

/// `EXPLAIN <stmt>;` on one line
fn explain_statement(statement: &str) -> String {
    let statement = statement.trim_end().trim_end_matches(';');
    format!("EXPLAIN {statement};")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl ExplainBatch {
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Query text handed to the client, one statement per line
    pub fn query(&self) -> String {
        self.statements.join("\n")
    }

    /// `[<index>] <statement>` lines
    pub fn numbered(&self) -> impl Iterator<Item = String> + '_ {
        self.statements
            .iter()
            .enumerate()
            .map(|(i, stmt)| format!("[{i}] {stmt}"))
    }

    /// Echo numbered statements followed by a blank line
    pub fn write_numbered(&self, out: &mut dyn Write) -> io::Result<()> {
        for line in self.numbered() {
            writeln!(out, "{line}")?;
        }
        writeln!(out)
    }
}
