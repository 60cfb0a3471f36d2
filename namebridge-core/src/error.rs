//! Error types for namebridge-core

use thiserror::Error;

/// Errors that can occur in the recommendation system
#[derive(Debug, Error)]
pub enum RecommendError {
    /// RocksDB error
    #[error("Storage error: {0}")]
    Storage(#[from] rocksdb::Error),

    /// Serialization error (bincode)
    #[error("Serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// UUID parsing error
    #[error("UUID error: {0}")]
    Uuid(#[from] uuid::Error),

    /// Model loading error
    #[error("Model error: {0}")]
    Model(String),

    /// Embedding generation error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Malformed caller input (empty query text, non-positive k)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Query attempted before the reference cache was built
    #[error("Reference cache not built yet")]
    NotReady,

    /// No usable reference rows remained after filtering malformed ones
    #[error("No usable reference rows after filtering")]
    EmptyReferenceSet,

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecommendError {
    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create an encoding error
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Self::InvalidPath(path.into())
    }
}

/// Result type for recommendation operations
pub type Result<T> = std::result::Result<T, RecommendError>;
