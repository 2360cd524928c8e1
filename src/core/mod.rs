// Module declarations
pub mod config;
pub mod connection;
pub mod error;

// Re-exports for convenience
pub use self::config::{ColorMode, ExplainConfig, FileConfig, SpecialOverride};
pub use connection::MysqlConnection;
pub use error::SetsumeiError;
