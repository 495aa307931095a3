//! Error types for the workplace client.

use thiserror::Error;

/// Errors raised by a [`RequestExecutor`](crate::executor::RequestExecutor).
///
/// From the client's point of view these are opaque: they are handed back to
/// the caller exactly as the executor produced them.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Authentication failed.
    #[error("Authentication failed")]
    AuthenticationFailed,
}

/// Errors returned by [`WorkplaceRoleClient`](crate::roles::WorkplaceRoleClient).
#[derive(Debug, Error)]
pub enum WorkplaceError {
    /// The request could not be built from the given input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The request executor failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body did not match the expected shape.
    #[error("Invalid API response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The response body was expected as text but is not valid UTF-8.
    #[error("Response body is not valid UTF-8: {0}")]
    InvalidText(#[from] std::string::FromUtf8Error),
}

/// Result alias for client operations.
pub type WorkplaceResult<T> = Result<T, WorkplaceError>;
