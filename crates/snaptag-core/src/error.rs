//! Error types for the snaptag keywording pipeline.
//!
//! Errors are organized by concern to provide clear, actionable messages
//! that include relevant context (file paths, HTTP status codes).
//!
//! Most failures never cross the public pipeline boundary: the generator,
//! store, and embedder convert their internal errors into the documented
//! degraded results (empty keyword lists, `false`) and log them.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for snaptag operations.
#[derive(Error, Debug)]
pub enum SnaptagError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Keyword pipeline errors
    #[error("Keyword error: {0}")]
    Keyword(#[from] KeywordError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Keyword pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum KeywordError {
    /// A model request failed (transport error, non-2xx status, or a
    /// response missing the expected text field)
    #[error("Model error: {message}")]
    Model {
        message: String,
        status_code: Option<u16>,
    },

    /// Reading an image from disk failed
    #[error("Read error for {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Writing a keyword file failed
    #[error("Persist error for {path}: {message}")]
    Persist { path: PathBuf, message: String },

    /// Rewriting an image's metadata failed
    #[error("Embed error for {path}: {message}")]
    Embed { path: PathBuf, message: String },

    /// The image container cannot hold embedded keywords
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },
}

/// Convenience type alias for snaptag results.
pub type Result<T> = std::result::Result<T, SnaptagError>;

/// Convenience type alias for pipeline-stage results.
pub type KeywordResult<T> = std::result::Result<T, KeywordError>;
