//! # Leafcam SDK - browser-style control surface for a Pi camera
//!
//! Top of the leafcam stack: sequences setting changes against the device
//! and keeps a deterministic view model for whatever front end sits above.
//!
//! ```rust,no_run
//! use leafcam_gateway::GatewayConfig;
//! use leafcam_sdk::{CameraSystem, UiSetting};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), leafcam_sdk::ControlError> {
//!     let system = CameraSystem::connect(GatewayConfig::default())?;
//!     system.init().await?;
//!
//!     // Clamped, applied, settled, and reflected back through the board:
//!     let sent = system.controls().apply_one(UiSetting::Brightness, 40.0).await?;
//!     assert_eq!(sent, 40.0);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! leafcam-sdk   (orchestrator + view binder)
//!     ↓
//! leafcam-state (status board: snapshot + pub/sub)
//!     ↓
//! leafcam-gateway (HTTP transport + CSRF)
//!     ↓
//! leafcam-codec (pure value conversions)
//! ```
//!
//! Every apply walks apply -> settle -> reload. When the device echoes the
//! post-apply UI settings inline the reload is skipped in favor of the
//! echo; on failure the board is resynchronized once, best effort, and the
//! original error re-raised.

// Main exports
pub use binder::{ControlState, InputDisposition, ViewBinder, DEBOUNCE_WINDOW, PROGRAMMATIC_COOLDOWN};
pub use capture::{AnalysisReport, CapturePreview};
pub use controls::{Controls, Timing};
pub use error::{ControlError, Result};
pub use preset::{PresetCatalog, PresetRef, UserPreset};
pub use resolution::ResolutionProfile;
pub use system::CameraSystem;

// Re-export commonly used types from the lower crates
pub use leafcam_codec::{UiSetting, UiSettings, ZoomQuality};
pub use leafcam_gateway::{GatewayConfig, GatewayError};
pub use leafcam_state::{EventKind, StatusBoard, StatusEvent, StatusSnapshot};

// Internal modules
mod binder;
mod capture;
mod controls;
mod error;
mod preset;
mod resolution;
mod system;
