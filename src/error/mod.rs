//! Error types for pentest-memory.

use thiserror::Error;

/// Primary error type for all memory operations.
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Tool execution error: {tool_name} — {message}")]
    ToolExecution { tool_name: String, message: String },
}

impl MemoryError {
    /// Whether this error came from the storage write path.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Serialization(_))
    }
}

impl From<toml::de::Error> for MemoryError {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, MemoryError>;
