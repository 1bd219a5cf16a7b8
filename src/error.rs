//! Error types for heurscan

use thiserror::Error;

/// Result type alias for scanner operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Scanner error types
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Offset {offset} out of range (length {length})")]
    BadLocation { offset: usize, length: usize },

    #[error("Line {line} out of range ({count} lines)")]
    BadLine { line: usize, count: usize },

    #[error("Invalid pattern in rule '{name}': {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Message(String),
}

impl From<toml::de::Error> for ScanError {
    fn from(e: toml::de::Error) -> Self {
        ScanError::Config(e.to_string())
    }
}
