use tracing::debug;

use crate::core::ExplainConfig;
use crate::parser::{Holder, PlaceholderKind, PlaceholderMatch, scan_placeholders};

/// Replaces `N` / `'S` placeholders with concrete literals
pub struct PlaceholderResolver<'a> {
    config: &'a ExplainConfig,
}

impl<'a> PlaceholderResolver<'a> {
    pub const fn new(config: &'a ExplainConfig) -> Self {
        Self { config }
    }

    /// Fill every placeholder of `statement`. `row` is the entry index used
    /// to look up special overrides; the column is the placeholder's ordinal
    /// within the statement.
    pub fn resolve(&self, statement: &str, row: usize) -> String {
        let mut output = String::with_capacity(statement.len());
        let mut last = 0;

        for (column, found) in scan_placeholders(statement).iter().enumerate() {
            let special = self.config.special(row, column);
            debug!(row, column, ?special, "special replacement lookup");
            debug!(?found, "placeholder");

            let fill = special.map_or_else(|| self.fill_for(found), str::to_string);

            output.push_str(&statement[last..found.start]);
            output.push_str(found.prefix);
            output.push_str(&fill);
            output.push_str(found.suffix);
            last = found.end;
        }

        output.push_str(&statement[last..]);
        output
    }

    /// Value for a placeholder with no special override
    pub fn fill_for(&self, found: &PlaceholderMatch<'_>) -> String {
        let config = self.config;
        match found.kind {
            PlaceholderKind::Limit => config.effective_limit().to_string(),
            PlaceholderKind::Offset => config.effective_offset().to_string(),
            PlaceholderKind::Like => config.effective_like().to_string(),
            // `x < N`: N bounds x from above
            PlaceholderKind::CompareRight(op) if op.is_less() => {
                config.effective_upper_bound().to_string()
            }
            PlaceholderKind::CompareRight(_) => config.effective_lower_bound().to_string(),
            // `N < x`: N bounds x from below
            PlaceholderKind::CompareLeft(op) if op.is_less() => {
                config.effective_lower_bound().to_string()
            }
            PlaceholderKind::CompareLeft(_) => config.effective_upper_bound().to_string(),
            PlaceholderKind::Bare => match found.holder {
                Holder::Number => config.number.to_string(),
                Holder::String => config.string.clone(),
            },
        }
    }
}
