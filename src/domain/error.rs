//! Error types for the news brief library.
//!
//! This module defines the centralized error type [`NewsBriefError`] and a type alias
//! [`Result`] used throughout the crate. Provider errors never escape the
//! orchestrator; they are converted into view-state messages there. Storage errors
//! are absorbed by the cache layer and only logged.

use thiserror::Error;

/// The main error type for news brief operations.
///
/// Most variants carry a human-readable description. Errors from external crates
/// (`std::io`, `serde_json`, `reqwest`) convert automatically via `#[from]`.
///
/// # Examples
///
/// ```
/// use news_brief::NewsBriefError;
///
/// fn validate_model(model: &str) -> Result<(), NewsBriefError> {
///     if model.is_empty() {
///         return Err(NewsBriefError::Config("model must not be empty".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(validate_model("").is_err());
/// ```
#[derive(Debug, Error)]
pub enum NewsBriefError {
    /// Reading or writing the durable cache slot failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The HTTP request to the generative-search backend could not complete.
    ///
    /// Covers connection failures, timeouts and unreadable bodies.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Provider error ({status}): {message}")]
    Provider {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The backend answered, but the payload does not describe news items.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for news brief operations.
pub type Result<T> = std::result::Result<T, NewsBriefError>;
