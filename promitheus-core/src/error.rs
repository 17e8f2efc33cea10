//! Error types for the Promitheus core library.

use thiserror::Error;

/// Top-level error type for all Promitheus operations.
///
/// Corrupt or missing state files and unknown event types are recovered
/// locally and never show up here.
#[derive(Error, Debug)]
pub enum PromitheusError {
    /// The agent identity cannot be used as a storage key.
    #[error("Invalid agent id {id:?}: {reason}")]
    InvalidAgentId {
        /// The rejected identifier.
        id: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Serialization or deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error (reading or writing state, writing the rendered report).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, PromitheusError>;
