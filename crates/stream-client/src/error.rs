//! Stream Error Types

use thiserror::Error;

/// Errors raised by the event stream client
#[derive(Debug, Error)]
pub enum StreamError {
    /// Transport could not be established
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Established transport failed while reading
    #[error("Transport error: {0}")]
    Transport(String),

    /// Page URL scheme has no stream counterpart
    #[error("Unsupported page scheme: {0}")]
    UnsupportedScheme(String),

    /// Page URL has no host to connect to
    #[error("Page URL has no host")]
    MissingHost,

    /// Endpoint could not be parsed
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}
