//! Error types for plugin-market
//!
//! This module defines the environment-level errors that abort a pipeline run.
//! Per-plugin problems are not errors in this sense: they are collected as
//! [`crate::plugins::ValidationError`] values inside each plugin's report.
//! Uses `thiserror` for automatic `Display` and `Error` implementations.

use thiserror::Error;

/// The primary error type for plugin-market operations.
#[derive(Error, Debug)]
pub enum MarketError {
    /// Configuration-related errors (bad config file, invalid override values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required path (plugins root, config file) does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

/// A specialized `Result` type for plugin-market operations.
pub type Result<T> = std::result::Result<T, MarketError>;
