//! Error types for the privflow analysis engine
//!
//! This module provides structured error definitions using thiserror. The
//! binary layers anyhow on top for context-rich propagation.

use thiserror::Error;

/// Main error type for privflow operations
#[derive(Error, Debug)]
pub enum PrivflowError {
    /// Privacy or evaluation settings out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Evaluator received original/transformed batches of different sizes
    #[error("Shape mismatch: {original} original workflows vs {transformed} transformed")]
    ShapeMismatch { original: usize, transformed: usize },

    /// Session record missing identity or timestamp fields
    #[error("Malformed record {}: {reason}", record_id.as_deref().unwrap_or("<unidentified>"))]
    MalformedRecord {
        record_id: Option<String>,
        reason: String,
    },

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl PrivflowError {
    /// Whether the caller can skip the failing item and keep going.
    ///
    /// Only per-record extraction failures are recoverable; everything else
    /// invalidates the whole call.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PrivflowError::MalformedRecord { .. })
    }
}

/// Result type alias for privflow operations
pub type Result<T> = std::result::Result<T, PrivflowError>;

/// Convert anyhow::Error to PrivflowError
impl From<anyhow::Error> for PrivflowError {
    fn from(err: anyhow::Error) -> Self {
        PrivflowError::Other(err.to_string())
    }
}
