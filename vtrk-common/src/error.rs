//! Common error types for VinylTrack

use thiserror::Error;

/// Common result type for VinylTrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared across VinylTrack services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested album or resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input, e.g. an upload with no parseable entries
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
