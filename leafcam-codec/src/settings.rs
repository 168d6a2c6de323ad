//! UI-space setting definitions, parsing, and normalization

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::display::ControlKind;

// ============================================================================
// UiSetting
// ============================================================================

/// The six user-facing camera controls
///
/// Each variant knows its wire key, its valid range, its neutral default,
/// and how it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiSetting {
    Zoom,
    Brightness,
    Sharpness,
    Contrast,
    Saturation,
    BackgroundBlur,
}

impl UiSetting {
    /// All settings in a stable order (the order controls are laid out)
    pub const ALL: [UiSetting; 6] = [
        UiSetting::Zoom,
        UiSetting::Brightness,
        UiSetting::Sharpness,
        UiSetting::Contrast,
        UiSetting::Saturation,
        UiSetting::BackgroundBlur,
    ];

    /// Key used in device JSON payloads
    pub fn key(&self) -> &'static str {
        match self {
            UiSetting::Zoom => "zoom",
            UiSetting::Brightness => "brightness",
            UiSetting::Sharpness => "sharpness",
            UiSetting::Contrast => "contrast",
            UiSetting::Saturation => "saturation",
            UiSetting::BackgroundBlur => "background_blur",
        }
    }

    /// Valid range in UI space, inclusive
    pub fn range(&self) -> (f64, f64) {
        match self {
            UiSetting::Zoom => (100.0, 400.0),
            UiSetting::Brightness => (-100.0, 100.0),
            UiSetting::Sharpness => (0.0, 200.0),
            UiSetting::Contrast => (0.0, 200.0),
            UiSetting::Saturation => (0.0, 200.0),
            UiSetting::BackgroundBlur => (0.0, 100.0),
        }
    }

    /// Neutral default (the "does nothing" value)
    pub fn neutral(&self) -> f64 {
        match self {
            UiSetting::Zoom => 100.0,
            UiSetting::Brightness => 0.0,
            UiSetting::Sharpness => 100.0,
            UiSetting::Contrast => 100.0,
            UiSetting::Saturation => 100.0,
            UiSetting::BackgroundBlur => 0.0,
        }
    }

    /// How this setting renders next to its control
    pub fn kind(&self) -> ControlKind {
        match self {
            UiSetting::Zoom => ControlKind::ZoomMultiplier,
            UiSetting::Brightness => ControlKind::SignedPercent,
            UiSetting::BackgroundBlur => ControlKind::Percent,
            _ => ControlKind::Percent,
        }
    }
}

impl std::str::FromStr for UiSetting {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UiSetting::ALL
            .iter()
            .copied()
            .find(|setting| setting.key() == s)
            .ok_or_else(|| UnknownSetting(s.to_string()))
    }
}

impl std::fmt::Display for UiSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a wire key does not name a known setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSetting(pub String);

impl std::fmt::Display for UnknownSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown UI setting: {}", self.0)
    }
}

impl std::error::Error for UnknownSetting {}

// ============================================================================
// clamp / numeric parsing
// ============================================================================

/// Hard clamp into `[min, max]`
///
/// Applied before every write to a control and before every apply request.
/// NaN collapses to `min` rather than propagating into a render.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Read a field as a finite f64, accepting both JSON numbers and numeric
/// strings (device firmware sends both depending on endpoint).
pub fn numeric_field(raw: &Value, key: &str) -> Option<f64> {
    let field = raw.get(key)?;
    let parsed = match field {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

// ============================================================================
// UiSettings
// ============================================================================

/// The full set of user-facing settings, always internally consistent
///
/// Construct via [`UiSettings::normalize`] or merge device payloads into an
/// existing value via [`UiSettings::merged`]; both enforce the shared-knob
/// conflict rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    pub zoom: f64,
    pub brightness: f64,
    pub sharpness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub background_blur: f64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            zoom: UiSetting::Zoom.neutral(),
            brightness: UiSetting::Brightness.neutral(),
            sharpness: UiSetting::Sharpness.neutral(),
            contrast: UiSetting::Contrast.neutral(),
            saturation: UiSetting::Saturation.neutral(),
            background_blur: UiSetting::BackgroundBlur.neutral(),
        }
    }
}

impl UiSettings {
    /// Decode a device payload, substituting the neutral default for any
    /// missing or non-numeric field, then enforce the conflict rule.
    pub fn normalize(raw: &Value) -> Self {
        Self::default().merged(raw)
    }

    /// Merge a partial device payload into `self`: present numeric fields
    /// win (clamped into range), everything else keeps its current value.
    /// The conflict rule is re-enforced on the result.
    pub fn merged(&self, raw: &Value) -> Self {
        let mut out = *self;
        for setting in UiSetting::ALL {
            if let Some(value) = numeric_field(raw, setting.key()) {
                let (min, max) = setting.range();
                out.set(setting, clamp(value, min, max));
            }
        }
        out.resolve_conflict();
        out
    }

    /// Sharpness and background blur share one hardware control; when
    /// sharpness sits at or above neutral it owns the knob and blur must
    /// read as off.
    fn resolve_conflict(&mut self) {
        if self.sharpness >= UiSetting::Sharpness.neutral() {
            self.background_blur = 0.0;
        }
    }

    pub fn get(&self, setting: UiSetting) -> f64 {
        match setting {
            UiSetting::Zoom => self.zoom,
            UiSetting::Brightness => self.brightness,
            UiSetting::Sharpness => self.sharpness,
            UiSetting::Contrast => self.contrast,
            UiSetting::Saturation => self.saturation,
            UiSetting::BackgroundBlur => self.background_blur,
        }
    }

    pub fn set(&mut self, setting: UiSetting, value: f64) {
        match setting {
            UiSetting::Zoom => self.zoom = value,
            UiSetting::Brightness => self.brightness = value,
            UiSetting::Sharpness => self.sharpness = value,
            UiSetting::Contrast => self.contrast = value,
            UiSetting::Saturation => self.saturation = value,
            UiSetting::BackgroundBlur => self.background_blur = value,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn normalize_of_empty_payload_is_all_neutral() {
        let ui = UiSettings::normalize(&json!({}));
        assert_eq!(ui, UiSettings::default());
    }

    #[test]
    fn neutral_settings_are_a_fixed_point() {
        let neutral = UiSettings::default();
        let raw = serde_json::to_value(neutral).unwrap();
        assert_eq!(UiSettings::normalize(&raw), neutral);
    }

    #[rstest]
    #[case(json!({"zoom": "oops"}), UiSetting::Zoom, 100.0)]
    #[case(json!({"brightness": null}), UiSetting::Brightness, 0.0)]
    #[case(json!({"sharpness": {}}), UiSetting::Sharpness, 100.0)]
    #[case(json!({}), UiSetting::Contrast, 100.0)]
    #[case(json!({"saturation": []}), UiSetting::Saturation, 100.0)]
    #[case(json!({"background_blur": "NaN"}), UiSetting::BackgroundBlur, 0.0)]
    fn bad_fields_fall_back_to_neutral(
        #[case] raw: serde_json::Value,
        #[case] setting: UiSetting,
        #[case] expected: f64,
    ) {
        let ui = UiSettings::normalize(&raw);
        assert_eq!(ui.get(setting), expected);
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let ui = UiSettings::normalize(&json!({"zoom": "250", "brightness": "-40.5"}));
        assert_eq!(ui.zoom, 250.0);
        assert_eq!(ui.brightness, -40.5);
    }

    #[test]
    fn sharpness_at_or_above_neutral_forces_blur_off() {
        let ui = UiSettings::normalize(&json!({"sharpness": 100, "background_blur": 55}));
        assert_eq!(ui.background_blur, 0.0);

        let ui = UiSettings::normalize(&json!({"sharpness": 150, "background_blur": 40}));
        assert_eq!(ui.sharpness, 150.0);
        assert_eq!(ui.background_blur, 0.0);
    }

    #[test]
    fn soft_sharpness_keeps_blur() {
        let ui = UiSettings::normalize(&json!({"sharpness": 60, "background_blur": 40}));
        assert_eq!(ui.sharpness, 60.0);
        assert_eq!(ui.background_blur, 40.0);
    }

    #[test]
    fn merged_keeps_absent_fields() {
        let mut base = UiSettings::default();
        base.zoom = 220.0;
        base.contrast = 130.0;

        let merged = base.merged(&json!({"brightness": 25}));
        assert_eq!(merged.zoom, 220.0);
        assert_eq!(merged.contrast, 130.0);
        assert_eq!(merged.brightness, 25.0);
    }

    #[test]
    fn merged_reapplies_conflict_rule() {
        let mut base = UiSettings::default();
        base.sharpness = 40.0;
        base.background_blur = 70.0;

        let merged = base.merged(&json!({"sharpness": 180}));
        assert_eq!(merged.sharpness, 180.0);
        assert_eq!(merged.background_blur, 0.0);
    }

    #[test]
    fn setting_lookup_by_key() {
        for setting in UiSetting::ALL {
            assert_eq!(setting.key().parse::<UiSetting>().unwrap(), setting);
        }
        assert!("framerate".parse::<UiSetting>().is_err());
    }

    #[test]
    fn clamp_nan_collapses_to_min() {
        assert_eq!(clamp(f64::NAN, 0.0, 200.0), 0.0);
    }

    proptest! {
        #[test]
        fn clamp_is_idempotent(v in -1e6f64..1e6, lo in -500.0f64..0.0, hi in 0.0f64..500.0) {
            let once = clamp(v, lo, hi);
            prop_assert_eq!(clamp(once, lo, hi), once);
        }

        #[test]
        fn clamp_stays_in_range(v in proptest::num::f64::ANY) {
            let out = clamp(v, -100.0, 100.0);
            prop_assert!((-100.0..=100.0).contains(&out));
        }

        #[test]
        fn normalized_settings_respect_the_shared_knob(
            sharpness in -50.0f64..250.0,
            blur in -20.0f64..120.0,
        ) {
            let ui = UiSettings::normalize(&serde_json::json!({
                "sharpness": sharpness,
                "background_blur": blur,
            }));
            if ui.sharpness >= 100.0 {
                prop_assert_eq!(ui.background_blur, 0.0);
            }
        }
    }
}
