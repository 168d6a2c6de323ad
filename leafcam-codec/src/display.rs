//! Display formatting and zoom quality advice
//!
//! Formatting is a pure function of a clamped value and the control kind, so
//! any front end renders the same strings the device-side tooling shows.

use serde::{Deserialize, Serialize};

use crate::convert::zoom_multiplier;

/// How a control's value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Rounded percent with a leading `+` for positive values ("+25%", "-10%", "0%")
    SignedPercent,
    /// Rounded percent, no sign marker ("40%")
    Percent,
    /// Zoom multiplier with one decimal place ("1.5x")
    ZoomMultiplier,
}

/// Format a (already clamped) value for display next to its control
pub fn format_value(kind: ControlKind, value: f64) -> String {
    match kind {
        ControlKind::ZoomMultiplier => format!("{:.1}x", zoom_multiplier(value)),
        ControlKind::SignedPercent => {
            let sign = if value > 0.0 { "+" } else { "" };
            format!("{sign}{}%", value.round() as i64)
        }
        ControlKind::Percent => format!("{}%", value.round() as i64),
    }
}

/// Advisory image-quality tier for digital zoom
///
/// Digital zoom crops the sensor, so quality degrades as the multiplier
/// grows. Bands are inclusive on their upper bound: <=1.5x best, <=2.0x
/// good, <=3.0x medium, beyond that low. Advisory only - never a hard
/// constraint on the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomQuality {
    Best,
    Good,
    Medium,
    Low,
}

impl ZoomQuality {
    /// Classify a zoom value in UI space (100 = 1.0x)
    pub fn classify(zoom_percent: f64) -> Self {
        let m = zoom_multiplier(zoom_percent);
        if m <= 1.5 {
            ZoomQuality::Best
        } else if m <= 2.0 {
            ZoomQuality::Good
        } else if m <= 3.0 {
            ZoomQuality::Medium
        } else {
            ZoomQuality::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ZoomQuality::Best => "best",
            ZoomQuality::Good => "good",
            ZoomQuality::Medium => "medium",
            ZoomQuality::Low => "low",
        }
    }
}
