/// Executor module - turns slow-log text into runnable EXPLAIN statements
///
/// Structure:
/// - resolver: placeholder substitution for a single statement
/// - explain: slow log -> `EXPLAIN ...;` batch
/// - client: runs the batch through the `mysql` command-line client
pub mod client;
pub mod explain;
pub mod resolver;

pub use client::{ClientResponse, MysqlClient};
pub use explain::{ExplainBatch, ExplainBuilder};
pub use resolver::PlaceholderResolver;
