//! Leafcam state management
//!
//! The status board is the single authoritative in-memory mirror of remote
//! device state. Everything the rest of the SDK knows about the camera
//! flows through it:
//!
//! ```text
//! Device HTTP API -> gateway -> codec decode -> StatusBoard -> subscribers
//!                                               (snapshot)    (events)
//! ```
//!
//! Refresh is pull-based: the board only reloads when asked (startup, after
//! a preset, manual refresh, post-apply reload). There is no background
//! polling - that matches how professional camera applications behave and
//! keeps the device's encoder pipeline undisturbed.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use leafcam_gateway::{CameraGateway, GatewayConfig};
//! use leafcam_state::{StatusBoard, StatusEvent};
//!
//! let gateway = Arc::new(CameraGateway::new(GatewayConfig::default())?);
//! let board = StatusBoard::new(gateway);
//!
//! board.subscribe(|event| {
//!     if let StatusEvent::Ui(ui) = event {
//!         println!("sharpness now {}", ui.sharpness);
//!     }
//! });
//!
//! board.load_from_device().await?;
//! let snapshot = board.snapshot(); // defensive copy, never the live state
//! ```

pub mod board;
pub mod event;
pub mod logging;
pub mod model;

pub use board::{BoardTiming, StatusBoard};
pub use event::{EventKind, StatusEvent};
pub use model::{ResolutionInfo, StatusSnapshot, SystemInfo, TechnicalSettings};

// Re-exported so consumers get the UI types from one place
pub use leafcam_codec::{UiSetting, UiSettings};

pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
