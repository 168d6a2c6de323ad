use std::time::Duration;

use thiserror::Error;

/// Transport-level errors from the device gateway
///
/// Every variant is surfaced to the caller; the gateway never retries and
/// never swallows a failure. Logical errors (an `"error"` field inside a
/// 2xx JSON body) are *not* represented here - those belong to the caller.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The device could not be reached at the transport level
    #[error("network error: {0}")]
    Network(String),

    /// The device answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The call exceeded its hard timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The configured base URL (or a joined path) is not a valid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The device answered 2xx but the body is not parseable JSON
    #[error("malformed JSON response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
