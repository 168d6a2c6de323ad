//! Device gateway for the leafcam SDK
//!
//! A thin async wrapper over the camera host's HTTP JSON API. It does three
//! things and nothing more:
//!
//! - attaches the anti-forgery token and JSON content type on every call
//! - enforces the two hard timeouts (settings calls vs. detection-class
//!   calls, which can legitimately run for tens of seconds)
//! - normalizes transport failures into [`GatewayError`]
//!
//! Retry and resynchronization policy deliberately live above this layer,
//! in the orchestrator. A 2xx body that carries an `"error"` field is a
//! *logical* failure and is the caller's concern; the gateway hands the
//! parsed JSON back untouched (see [`logical_error`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use leafcam_gateway::{CameraGateway, GatewayConfig};
//!
//! let gateway = CameraGateway::new(GatewayConfig {
//!     base_url: "http://192.168.1.42:8000".into(),
//!     csrf_token: "token".into(),
//!     ..GatewayConfig::default()
//! })?;
//!
//! let settings = gateway.get("/api/settings/").await?;
//! ```

mod client;
mod error;

pub use client::{logical_error, CameraGateway, GatewayConfig, CSRF_HEADER};
pub use error::GatewayError;

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
