//! Error types for the Strata service.
//!
//! Every failure inside the core is expressed as a [`StrataError`].
//! Public operations on [`Services`](crate::core::services::Services)
//! convert most of these into result values at their boundary; the
//! HTTP adapter maps the remaining ones to status codes.

use thiserror::Error;

/// Result type alias for Strata operations
pub type Result<T> = std::result::Result<T, StrataError>;

/// Main error type for the Strata service
#[derive(Error, Debug)]
pub enum StrataError {
    /// A single source file could not be read (skipped, non-fatal)
    #[error("Failed to load file: {0}")]
    Load(String),

    /// Any failure during an index build
    #[error("Indexing failed: {0}")]
    Indexing(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Completion failed: {0}")]
    Completion(String),

    /// Reading chunks or metadata from a generation failed
    #[error("Store read failed: {0}")]
    StoreRead(String),

    /// Writing, opening or deleting a generation failed
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl StrataError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this error was caused by invalid caller input
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            StrataError::InvalidQuery(_) | StrataError::InvalidPath(_) | StrataError::Config(_)
        )
    }

    /// Check if this error came from one of the model services
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            StrataError::Embedding(_) | StrataError::Completion(_) | StrataError::Http(_)
        )
    }
}
