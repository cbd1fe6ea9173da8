//! Backend client error types.

use thiserror::Error;

/// Errors that can occur when talking to the document backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// The `error` field of the response body, or the raw body.
        message: String,
    },

    /// The backend refused to store a signature.
    ///
    /// Displayed as the bare message, which is what the user sees.
    #[error("{message}")]
    SignRejected { status: u16, message: String },

    /// The configured base URL is unusable.
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
}
