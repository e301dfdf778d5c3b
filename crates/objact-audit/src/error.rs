//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur while recording or querying change events.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The change log could not be opened.
    #[error("failed to initialize change log: {0}")]
    InitializationFailed(String),

    /// Storage error.
    #[error("storage error: {0}")]
    StorageError(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
