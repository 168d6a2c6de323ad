//! Settings codec for the leafcam SDK
//!
//! Pure functions only - no I/O, no async, no shared state. This crate owns
//! the translation between the two value spaces the system deals in:
//!
//! - **UI space**: the percentages and multipliers a person adjusts
//!   (zoom 100-400, brightness -100..100, sharpness 0-200, ...)
//! - **Technical space**: the device-native camera parameters
//!   (ExposureValue in EV, Sharpness in [0, 2], crop multiplier, ...)
//!
//! It also owns the one genuinely tricky rule in the system: sharpness and
//! background blur are two UI controls backed by a single hardware knob, so
//! they are mutually exclusive. `UiSettings::normalize` enforces
//! `sharpness >= 100 => background_blur == 0` after every decode.
//!
//! # Example
//!
//! ```rust
//! use leafcam_codec::{UiSetting, UiSettings, clamp};
//! use serde_json::json;
//!
//! let ui = UiSettings::normalize(&json!({"sharpness": 150, "background_blur": 40}));
//! assert_eq!(ui.sharpness, 150.0);
//! assert_eq!(ui.background_blur, 0.0); // sharpness wins the shared knob
//!
//! let (min, max) = UiSetting::Brightness.range();
//! assert_eq!(clamp(500.0, min, max), 100.0);
//! ```

mod convert;
mod display;
mod settings;

pub use convert::{
    brightness_to_ev, ev_to_brightness, factor_to_percent, knob_to_ui, percent_to_factor,
    sharpness_knob, zoom_multiplier,
};
pub use display::{format_value, ControlKind, ZoomQuality};
pub use settings::{clamp, numeric_field, UiSetting, UiSettings};
