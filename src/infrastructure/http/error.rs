use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when calling an HTTP collaborator
#[derive(Error, Debug)]
pub enum HttpCallError {
    /// Connection, timeout, or protocol failure before a status was read
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The body could not be decoded into the expected shape
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl HttpCallError {
    /// Returns true if this error is transient and should be retried
    ///
    /// Transient errors include:
    /// - Transport failures other than malformed requests
    /// - Rate limit exceeded (429)
    /// - Server errors (5xx)
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(err) => !err.is_builder() && !err.is_decode(),
            Self::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::Decode(_) => false,
        }
    }
}
