//! Error types for parnaso-core

use thiserror::Error;

/// Main error type for the parnaso-core library
///
/// Only the storage, configuration and import paths can fail. The analytics
/// engine is infallible and never returns this type.
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A session failed validation before being stored
    #[error("invalid session {id}: {message}")]
    InvalidSession { id: String, message: String },

    /// Settings failed validation before being stored
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Project not found for the given user
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// No data stored for the given user
    #[error("user not found: {0}")]
    UserNotFound(String),
}

/// Result type alias for parnaso-core
pub type Result<T> = std::result::Result<T, Error>;
