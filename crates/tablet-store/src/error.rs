use std::path::PathBuf;

use tablet_types::Digest;

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `initialize()` found an existing store directory.
    #[error("store already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    /// No blob exists at the digest's shard path.
    #[error("object not found: {0}")]
    NotFound(Digest),

    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The compressed stream could not be produced or decoded.
    #[error("compression error: {0}")]
    Compression(String),

    /// The configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
