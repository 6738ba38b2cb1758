//! Error types for the external collaborators.

use thiserror::Error;

/// Failure talking to the snapshot store, recompute endpoint or report
/// generator, or reading the local fallback store.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Server answered with a non-success status
    #[error("Request failed ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error text from the response body, or the status text.
        message: String,
    },

    /// Connection, DNS or timeout failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No version with this id
    #[error("Version not found: {0}")]
    NotFound(String),

    /// Local store I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Local store encoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Blocking request task panicked or was cancelled
    #[error("Request task failed: {0}")]
    Task(String),
}

impl From<ureq::Error> for SyncError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                let fallback = response.status_text().to_string();
                let message = response
                    .into_json::<serde_json::Value>()
                    .ok()
                    .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(String::from))
                    .unwrap_or(fallback);
                SyncError::Status { status, message }
            }
            ureq::Error::Transport(transport) => SyncError::Transport(transport.to_string()),
        }
    }
}

/// Result type for collaborator calls
pub type SyncResult<T> = Result<T, SyncError>;
