//! Error types for the host integration layer.

use promitheus_core::PromitheusError;
use thiserror::Error;

/// Errors surfaced to the host runtime.
#[derive(Error, Debug)]
pub enum HostError {
    /// The engine failed (I/O on persistence, bad agent id, config).
    #[error("Engine error: {0}")]
    Engine(#[from] PromitheusError),

    /// The host passed parameters the operation cannot use.
    #[error("Invalid parameters for {operation}: {reason}")]
    InvalidParams {
        /// Operation name as registered.
        operation: String,
        /// What was wrong.
        reason: String,
    },

    /// No operation with this name exists.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// The transport could not deliver the request or read the reply.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response could not be converted to JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, HostError>;
