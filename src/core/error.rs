use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetsumeiError {
    #[error("Invalid header: expected a line starting with `Count` in entry:\n{0}")]
    InvalidHeader(String),
    #[error("Empty log: no statements found in the input")]
    EmptyLog,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to read '{}': {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
