//! Common error types for the corpus tools

use thiserror::Error;

/// Common result type for corpus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by every corpus tool
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

    /// The row store could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}
