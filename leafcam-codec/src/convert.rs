//! UI-space <-> technical-space conversions
//!
//! The device speaks libcamera units: ExposureValue in EV, Contrast /
//! Saturation / Sharpness as factors in [0, 2] with 1.0 neutral, zoom as a
//! sensor crop multiplier. The UI speaks percentages. These functions are
//! the single place that relationship lives.

/// UI zoom percent (100-400) to crop multiplier (1.0-4.0)
pub fn zoom_multiplier(zoom_percent: f64) -> f64 {
    zoom_percent / 100.0
}

/// UI percent (0-200, 100 neutral) to a device factor (0.0-2.0, 1.0 neutral)
///
/// Used for contrast and saturation.
pub fn percent_to_factor(percent: f64) -> f64 {
    percent / 100.0
}

/// Device factor back to UI percent
pub fn factor_to_percent(factor: f64) -> f64 {
    factor * 100.0
}

/// UI brightness (-100..100) to ExposureValue compensation (-2.0..2.0 EV)
pub fn brightness_to_ev(brightness: f64) -> f64 {
    brightness / 100.0 * 2.0
}

/// ExposureValue compensation back to UI brightness
pub fn ev_to_brightness(ev: f64) -> f64 {
    ev / 2.0 * 100.0
}

/// Resolve the shared hardware knob behind sharpness and background blur
///
/// The device exposes one `Sharpness` parameter in [0, 2]. The UI splits it
/// into two controls: sharpness (0-200) owns the upper half of the range,
/// background blur (0-100) the lower half. Sharpness at or above neutral
/// takes precedence; blur is only encoded when sharpness has yielded the
/// knob.
pub fn sharpness_knob(sharpness: f64, background_blur: f64) -> f64 {
    if sharpness >= 100.0 || background_blur <= 0.0 {
        sharpness / 100.0
    } else {
        1.0 - background_blur / 100.0
    }
}

/// Decode the shared knob back into `(sharpness, background_blur)` UI values
///
/// A knob at or above neutral reads as pure sharpness; below neutral it
/// reads as blur with sharpness reporting the same softened value, which
/// keeps the round trip consistent with the conflict invariant.
pub fn knob_to_ui(knob: f64) -> (f64, f64) {
    if knob >= 1.0 {
        (knob * 100.0, 0.0)
    } else {
        (knob * 100.0, (1.0 - knob) * 100.0)
    }
}
