//! Transport error types.

use thiserror::Error;

/// A network or remote-side failure.
///
/// Records affected by a transport failure keep their local state and are
/// retried on the next sync cycle.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Sync is not configured
    #[error("Sync not configured. Add server_url and api_key to config.")]
    NotConfigured,
    /// Could not reach the server or the request did not complete
    #[error("Connection error: {0}")]
    Connection(String),
    /// Server answered with a non-success status
    #[error("Server returned status {status}: {message}")]
    Status { status: u16, message: String },
    /// Response body did not match the wire format
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Connection(e.to_string())
        }
    }
}
