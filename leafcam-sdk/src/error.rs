use leafcam_gateway::GatewayError;
use thiserror::Error;

/// High-level errors for camera control operations
///
/// Transport failures bubble up from the gateway unchanged. Logical
/// failures are the device answering 2xx with an `"error"` field; the
/// orchestrator treats both identically (resync once, then re-surface).
/// Validation problems never appear here - out-of-range input is clamped
/// locally before a request is built.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Network, HTTP status, or timeout failure
    #[error(transparent)]
    Transport(#[from] GatewayError),

    /// The device reported a logical failure in its response body
    #[error("device error: {message}")]
    Device { message: String },

    /// The device answered successfully but with a shape we cannot use
    #[error("unexpected response: {0}")]
    Response(String),
}

impl ControlError {
    pub fn device(message: impl Into<String>) -> Self {
        ControlError::Device {
            message: message.into(),
        }
    }

    /// The message the device reported, for logical errors
    pub fn device_message(&self) -> Option<&str> {
        match self {
            ControlError::Device { message } => Some(message),
            _ => None,
        }
    }
}

/// Result type for control operations
pub type Result<T> = std::result::Result<T, ControlError>;
