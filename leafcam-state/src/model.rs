//! Snapshot model types
//!
//! Field names on the wire follow the device's libcamera-style keys
//! (`AnalogueGain`, `ExposureTime`, ...); the structs keep idiomatic Rust
//! names and map via serde renames. Merge methods are deliberately
//! forgiving: an absent or non-numeric field leaves the current value
//! untouched, because the device routinely reports partial documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use leafcam_codec::{numeric_field, UiSettings};

// ============================================================================
// TechnicalSettings
// ============================================================================

/// Device-native camera parameters
///
/// Owned exclusively by the status board; only ever mutated by decoding a
/// device response. The UI never writes these directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSettings {
    /// Frames per second
    pub framerate: u32,
    /// Analogue sensor gain, >= 0.0; 0.0 means auto
    #[serde(rename = "AnalogueGain")]
    pub analogue_gain: f64,
    /// Exposure time in microseconds; 0 means auto
    #[serde(rename = "ExposureTime")]
    pub exposure_time: u64,
    /// Exposure compensation in EV, signed
    #[serde(rename = "ExposureValue")]
    pub exposure_value: f64,
    /// Contrast factor in [0, 2], 1.0 neutral
    #[serde(rename = "Contrast")]
    pub contrast: f64,
    /// Saturation factor in [0, 2], 1.0 neutral
    #[serde(rename = "Saturation")]
    pub saturation: f64,
    /// The shared sharpness/blur knob in [0, 2], 1.0 neutral
    #[serde(rename = "Sharpness")]
    pub sharpness: f64,
    /// Auto-exposure enabled
    #[serde(rename = "AeEnable")]
    pub ae_enable: bool,
    /// Auto white balance enabled
    #[serde(rename = "AwbEnable")]
    pub awb_enable: bool,
}

impl Default for TechnicalSettings {
    fn default() -> Self {
        Self {
            framerate: 30,
            analogue_gain: 1.0,
            exposure_time: 0,
            exposure_value: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            sharpness: 1.0,
            ae_enable: true,
            awb_enable: true,
        }
    }
}

impl TechnicalSettings {
    /// Merge a partial device payload; unknown or malformed fields are kept
    pub fn merge(&mut self, raw: &Value) {
        if let Some(v) = numeric_field(raw, "framerate") {
            if v >= 0.0 {
                self.framerate = v as u32;
            }
        }
        if let Some(v) = numeric_field(raw, "AnalogueGain") {
            if v >= 0.0 {
                self.analogue_gain = v;
            }
        }
        if let Some(v) = numeric_field(raw, "ExposureTime") {
            if v >= 0.0 {
                self.exposure_time = v as u64;
            }
        }
        if let Some(v) = numeric_field(raw, "ExposureValue") {
            self.exposure_value = v;
        }
        if let Some(v) = numeric_field(raw, "Contrast") {
            self.contrast = v;
        }
        if let Some(v) = numeric_field(raw, "Saturation") {
            self.saturation = v;
        }
        if let Some(v) = numeric_field(raw, "Sharpness") {
            self.sharpness = v;
        }
        if let Some(v) = raw.get("AeEnable").and_then(Value::as_bool) {
            self.ae_enable = v;
        }
        if let Some(v) = raw.get("AwbEnable").and_then(Value::as_bool) {
            self.awb_enable = v;
        }
    }

    /// Technical bundle equivalent to a set of UI settings
    ///
    /// Used when saving a user preset: the client only holds UI values, but
    /// presets store (and are applied as) device parameters. Fields the UI
    /// does not control keep their current device values, so this takes the
    /// live settings as the base.
    pub fn with_ui(&self, ui: &UiSettings) -> Self {
        let mut out = self.clone();
        out.exposure_value = leafcam_codec::brightness_to_ev(ui.brightness);
        out.contrast = leafcam_codec::percent_to_factor(ui.contrast);
        out.saturation = leafcam_codec::percent_to_factor(ui.saturation);
        out.sharpness = leafcam_codec::sharpness_knob(ui.sharpness, ui.background_blur);
        out
    }
}

// ============================================================================
// SystemInfo
// ============================================================================

/// Coarse device state reported by `/api/settings/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub state: String,
    pub mode: String,
    /// Name of the active preset, "-" when none
    pub preset: String,
}

impl Default for SystemInfo {
    fn default() -> Self {
        Self {
            state: "unknown".to_string(),
            mode: "unknown".to_string(),
            preset: "-".to_string(),
        }
    }
}

impl SystemInfo {
    pub fn merge(&mut self, raw: &Value) {
        if let Some(v) = raw.get("state").and_then(Value::as_str) {
            self.state = v.to_string();
        }
        if let Some(v) = raw.get("mode").and_then(Value::as_str) {
            self.mode = v.to_string();
        }
        if let Some(v) = raw.get("preset").and_then(Value::as_str) {
            self.preset = v.to_string();
        }
    }
}

// ============================================================================
// ResolutionInfo
// ============================================================================

/// Current sensor/profile information from `/api/resolution/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionInfo {
    pub width: u32,
    pub height: u32,
    pub megapixels: f64,
    pub max_fps: u32,
    pub aspect_ratio: String,
    pub profile: String,
}

impl Default for ResolutionInfo {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            megapixels: 2.1,
            max_fps: 30,
            aspect_ratio: "16:9".to_string(),
            profile: "full_hd".to_string(),
        }
    }
}

impl ResolutionInfo {
    pub fn merge(&mut self, raw: &Value) {
        // resolution_main arrives as a two-element [width, height] array
        if let Some(dims) = raw.get("resolution_main").and_then(Value::as_array) {
            if let (Some(w), Some(h)) = (
                dims.first().and_then(Value::as_u64),
                dims.get(1).and_then(Value::as_u64),
            ) {
                self.width = w as u32;
                self.height = h as u32;
            }
        }
        if let Some(v) = numeric_field(raw, "megapixels") {
            self.megapixels = v;
        }
        if let Some(v) = numeric_field(raw, "max_fps") {
            if v >= 0.0 {
                self.max_fps = v as u32;
            }
        }
        if let Some(v) = raw.get("aspect_ratio").and_then(Value::as_str) {
            self.aspect_ratio = v.to_string();
        }
        // older firmware uses "profile", newer "profile_name"
        if let Some(v) = raw
            .get("profile_name")
            .or_else(|| raw.get("profile"))
            .and_then(Value::as_str)
        {
            self.profile = v.to_string();
        }
    }
}

// ============================================================================
// StatusSnapshot
// ============================================================================

/// Aggregate of everything the board mirrors
///
/// Created once with defaults, refreshed wholesale by
/// `StatusBoard::load_from_device`, never partially torn down.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub technical: TechnicalSettings,
    pub ui: UiSettings,
    pub system: SystemInfo,
    pub resolution: ResolutionInfo,
}

// ============================================================================
// Tests
// ============================================================================
