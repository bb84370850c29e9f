//! Error types for the bridge library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A statement was rejected by the backend engine.
    ///
    /// Carries the backend's native error message verbatim. Transpilation
    /// failures never surface here; they are recovered internally by falling
    /// back to the original SQL text.
    #[error("Execution failed on {dialect}: {message}")]
    Execution { dialect: String, message: String },

    /// A file-based SQL source could not be resolved.
    ///
    /// Kept distinct from [`BridgeError::Execution`] so callers can tell
    /// "bad input location" apart from "bad SQL or backend".
    #[error("SQL source not found: {0}")]
    SourceNotFound(PathBuf),

    /// DuckDB connection or driver error
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BridgeError {
    /// Create a Config error
    pub fn config(message: impl Into<String>) -> Self {
        BridgeError::Config(message.into())
    }

    /// Create an Execution error for the given engine dialect
    pub fn execution(dialect: impl Into<String>, message: impl Into<String>) -> Self {
        BridgeError::Execution {
            dialect: dialect.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        // Add error chain for wrapped errors
        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, BridgeError>;
