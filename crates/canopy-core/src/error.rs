//! Error types for Canopy Core.

use thiserror::Error;

/// Result type alias for canopy operations.
pub type Result<T> = std::result::Result<T, CanopyError>;

/// Errors that can occur while driving a search.
///
/// Malformed or out-of-bounds control proposals are never surfaced here:
/// they are recovered locally by substituting the baseline vector.
#[derive(Error, Debug)]
pub enum CanopyError {
    /// Generation backend failure. Fatal; never retried internally.
    #[error("generation failed: {0}")]
    Generation(String),

    /// Backend spec string with an unrecognized prefix tag.
    #[error("unknown backend spec: {0}")]
    UnknownBackend(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
