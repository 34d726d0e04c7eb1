//! Error types for Floodgate.

use thiserror::Error;

/// Main error type for Floodgate operations.
///
/// Only configuration loading can fail; store and limiter operations
/// are total over their inputs.
#[derive(Error, Debug)]
pub enum FloodgateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Floodgate operations.
pub type Result<T> = std::result::Result<T, FloodgateError>;
