//! Preset identities and the user preset catalog

use serde::{Deserialize, Serialize};
use serde_json::Value;

use leafcam_codec::{ev_to_brightness, factor_to_percent, knob_to_ui, numeric_field, UiSettings};

/// A preset the device can apply
///
/// System presets are named and baked into the device firmware; user
/// presets are stored server-side under a numeric id. They go through
/// different endpoints but converge on the same settle-and-reload flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetRef {
    System(String),
    User(i64),
}

impl PresetRef {
    pub fn system(name: impl Into<String>) -> Self {
        PresetRef::System(name.into())
    }
}

impl std::fmt::Display for PresetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetRef::System(name) => write!(f, "{name}"),
            PresetRef::User(id) => write!(f, "user preset #{id}"),
        }
    }
}

/// A saved user preset as returned by the catalog endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreset {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    /// The stored device-parameter bundle
    #[serde(default)]
    pub settings: Value,
}

impl UserPreset {
    /// Decode the stored technical bundle back into UI percentages
    ///
    /// Lets a preset list render "what would this do" without applying it.
    /// Returns `None` when the stored bundle is empty or not an object.
    pub fn ui_preview(&self) -> Option<UiSettings> {
        let obj = self.settings.as_object()?;
        if obj.is_empty() {
            return None;
        }

        let mut ui = UiSettings::default();
        if let Some(ev) = numeric_field(&self.settings, "ExposureValue") {
            ui.brightness = ev_to_brightness(ev);
        }
        if let Some(factor) = numeric_field(&self.settings, "Contrast") {
            ui.contrast = factor_to_percent(factor);
        }
        if let Some(factor) = numeric_field(&self.settings, "Saturation") {
            ui.saturation = factor_to_percent(factor);
        }
        if let Some(knob) = numeric_field(&self.settings, "Sharpness") {
            let (sharpness, blur) = knob_to_ui(knob);
            ui.sharpness = sharpness;
            ui.background_blur = blur;
        }
        Some(ui)
    }
}

/// Response of `/api/presets/user/`: saved presets plus the firmware's
/// system preset catalog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresetCatalog {
    #[serde(default)]
    pub presets: Vec<UserPreset>,
    #[serde(default)]
    pub system_presets: Vec<String>,
}

impl PresetCatalog {
    /// The preset flagged as the user's default, if any
    pub fn default_preset(&self) -> Option<&UserPreset> {
        self.presets.iter().find(|p| p.is_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalog_deserializes_the_wire_shape() {
        let catalog: PresetCatalog = serde_json::from_value(json!({
            "presets": [
                {"id": 3, "name": "greenhouse", "is_default": true,
                 "settings": {"ExposureValue": 1.0, "Sharpness": 1.5}},
                {"id": 7, "name": "bench", "settings": {}},
            ],
            "system_presets": ["auto", "leaf_sharp", "daylight"],
        }))
        .unwrap();

        assert_eq!(catalog.presets.len(), 2);
        assert_eq!(catalog.system_presets.len(), 3);
        assert_eq!(catalog.default_preset().map(|p| p.id), Some(3));
        assert!(!catalog.presets[1].is_default);
    }

    #[test]
    fn ui_preview_decodes_device_units() {
        let preset = UserPreset {
            id: 1,
            name: "soft".into(),
            is_default: false,
            settings: json!({"ExposureValue": -1.0, "Sharpness": 0.6, "Contrast": 1.2}),
        };

        let ui = preset.ui_preview().unwrap();
        assert_eq!(ui.brightness, -50.0);
        assert!((ui.background_blur - 40.0).abs() < 1e-9);
        assert!((ui.contrast - 120.0).abs() < 1e-9);
    }

    #[test]
    fn ui_preview_of_an_empty_bundle_is_none() {
        let preset = UserPreset {
            id: 2,
            name: "empty".into(),
            is_default: false,
            settings: json!({}),
        };
        assert!(preset.ui_preview().is_none());
    }

    #[test]
    fn preset_ref_display() {
        assert_eq!(PresetRef::system("auto").to_string(), "auto");
        assert_eq!(PresetRef::User(4).to_string(), "user preset #4");
    }
}
