//! Error types for the collaborator seams.
//!
//! The damage engine itself never fails; these errors only describe what
//! can go wrong while reading the entity database or the custom-profile
//! store.

use thiserror::Error;

/// Errors that can occur while loading the entity database.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the database file.
    #[error("Failed to read database: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON.
    #[error("Failed to parse database JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is well-formed but has no usable entity list.
    #[error("Invalid database payload: {0}")]
    InvalidPayload(String),
}

/// Errors that can occur while writing the custom-profile store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to read or write the backing file.
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode the profile list.
    #[error("Store serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for database loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
