//! Memloom error types

use thiserror::Error;

/// Memloom error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Graph persistence error
    ///
    /// Returned when the durable copy of the graph could not be written.
    /// The in-memory graph keeps its mutations; a caller that sees this
    /// error must assume disk is behind memory.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Memloom operations
pub type Result<T> = std::result::Result<T, Error>;
