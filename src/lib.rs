// Setsumei - EXPLAIN every query of a MySQL slow log in one go
// slow log -> EXPLAIN batch -> mysql client -> aligned, highlighted plan table

// Clippy configuration
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::multiple_crate_versions)]

// Configuration, connection settings, errors
pub mod core;

// Slow log entries and placeholder scanning
pub mod parser;

// Placeholder resolution, EXPLAIN batch, mysql client
pub mod executor;

// Plan table rendering
pub mod format;

// Re-export commonly used types for convenience
pub use crate::core::{ColorMode, ExplainConfig, MysqlConnection, SetsumeiError, SpecialOverride};
pub use executor::{ExplainBatch, ExplainBuilder, MysqlClient, PlaceholderResolver};
pub use format::TableFormatter;
