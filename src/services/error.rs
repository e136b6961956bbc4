//! Error types for the external service clients.

use thiserror::Error;

/// Errors returned by the design/recommendation backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error detail from the backend, or the raw body.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors from loading a 3D model or thumbnail.
#[derive(Error, Debug)]
pub enum AssetError {
    /// No asset exists for this id (or the store refused it).
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Transport failure while fetching the asset.
    #[error("Asset request failed: {0}")]
    Http(#[from] reqwest::Error),
}
