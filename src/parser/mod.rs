// Module declarations
mod placeholder;
mod slow_log;

// Re-export public types
pub use placeholder::{
    Comparison,
    Holder,
    PlaceholderKind,
    PlaceholderMatch,
    is_word_char,
    scan_placeholders,
};
pub use slow_log::{LogEntry, parse_entries, split_entries};
