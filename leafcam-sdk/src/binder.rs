//! View binder: deterministic control-surface state
//!
//! Tracks one editable control per UI setting and enforces the two rules a
//! live control surface needs:
//!
//! - Programmatic-update suppression: after a snapshot lands from the
//!   status board, user input on that control is ignored for a short
//!   cooldown so that a slider being dragged by code does not bounce its
//!   own value back at the device.
//! - Debounce: rapid user edits to one control collapse into a single
//!   apply, taken from the newest value once the debounce window expires.
//!
//! The binder never sleeps or spawns: every method takes the current
//! [`Instant`] as a parameter and pending work is drained with [`poll`].
//! That keeps the time arithmetic fully testable.
//!
//! ```rust,ignore
//! let mut binder = ViewBinder::new();
//! let now = Instant::now();
//! binder.input(UiSetting::Brightness, 40.0, now);
//! // ... DEBOUNCE_WINDOW later ...
//! for (setting, value) in binder.poll(Instant::now()) {
//!     controls.apply_one(setting, value).await?;
//! }
//! ```
//!
//! [`poll`]: ViewBinder::poll

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use leafcam_codec::{clamp, format_value, ControlKind, UiSetting, UiSettings, ZoomQuality};

/// How long user input on a control stays suppressed after a programmatic
/// update lands on it
pub const PROGRAMMATIC_COOLDOWN: Duration = Duration::from_millis(200);

/// How long a control waits after the last keystroke before its edit is
/// considered final
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy)]
struct PendingEdit {
    value: f64,
    due: Instant,
}

/// Presentation state for a single control
#[derive(Debug, Clone)]
pub struct ControlState {
    /// Current (clamped) value in UI units
    pub value: f64,
    /// Formatted label, e.g. `"+25%"` or `"1.5x"`
    pub display: String,
    /// Zoom quality band; `None` for every non-zoom control
    pub quality: Option<ZoomQuality>,
    suppress_until: Option<Instant>,
    pending: Option<PendingEdit>,
}

impl ControlState {
    fn with_value(setting: UiSetting, value: f64) -> Self {
        let quality = match setting.kind() {
            ControlKind::ZoomMultiplier => Some(ZoomQuality::classify(value)),
            _ => None,
        };
        Self {
            value,
            display: format_value(setting.kind(), value),
            quality,
            suppress_until: None,
            pending: None,
        }
    }

    fn set_value(&mut self, setting: UiSetting, value: f64) {
        self.value = value;
        self.display = format_value(setting.kind(), value);
        if setting.kind() == ControlKind::ZoomMultiplier {
            self.quality = Some(ZoomQuality::classify(value));
        }
    }
}

/// What became of a user edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputDisposition {
    /// Edit taken; an apply is now pending behind the debounce window
    Accepted,
    /// Edit ignored because the control was inside its programmatic cooldown
    Suppressed,
}

/// Deterministic view model for the whole control surface
pub struct ViewBinder {
    controls: HashMap<UiSetting, ControlState>,
    cooldown: Duration,
    debounce: Duration,
}

impl Default for ViewBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewBinder {
    /// Binder with every control at its neutral value
    pub fn new() -> Self {
        Self::with_windows(PROGRAMMATIC_COOLDOWN, DEBOUNCE_WINDOW)
    }

    /// Binder with custom suppression/debounce windows, for tests
    pub fn with_windows(cooldown: Duration, debounce: Duration) -> Self {
        let controls = UiSetting::ALL
            .iter()
            .map(|&s| (s, ControlState::with_value(s, s.neutral())))
            .collect();
        Self {
            controls,
            cooldown,
            debounce,
        }
    }

    /// Push a snapshot from the status board into every control
    ///
    /// Marks each control as programmatically updated, opening the
    /// suppression window. A pending user edit survives the snapshot: the
    /// user typed it deliberately and it has not been applied yet.
    pub fn apply_snapshot(&mut self, settings: &UiSettings, now: Instant) {
        for &setting in UiSetting::ALL.iter() {
            let (min, max) = setting.range();
            let value = clamp(settings.get(setting), min, max);
            if let Some(state) = self.controls.get_mut(&setting) {
                state.set_value(setting, value);
                state.suppress_until = Some(now + self.cooldown);
            }
        }
    }

    /// Register a user edit on one control
    ///
    /// Inside the programmatic cooldown the edit is dropped entirely, the
    /// pending state included stays untouched. Otherwise the value is
    /// clamped, shown optimistically, and the debounce deadline (re)armed.
    pub fn input(&mut self, setting: UiSetting, value: f64, now: Instant) -> InputDisposition {
        let (min, max) = setting.range();
        let value = clamp(value, min, max);

        let state = self
            .controls
            .entry(setting)
            .or_insert_with(|| ControlState::with_value(setting, setting.neutral()));

        if let Some(until) = state.suppress_until {
            if now < until {
                debug!(setting = %setting, value, "edit suppressed inside programmatic cooldown");
                return InputDisposition::Suppressed;
            }
        }

        state.set_value(setting, value);
        state.pending = Some(PendingEdit {
            value,
            due: now + self.debounce,
        });
        InputDisposition::Accepted
    }

    /// Drain every edit whose debounce window has expired
    ///
    /// Returned in stable [`UiSetting::ALL`] order so applies hit the
    /// device in a predictable sequence.
    pub fn poll(&mut self, now: Instant) -> Vec<(UiSetting, f64)> {
        let mut due = Vec::new();
        for &setting in UiSetting::ALL.iter() {
            if let Some(state) = self.controls.get_mut(&setting) {
                if let Some(pending) = state.pending {
                    if now >= pending.due {
                        state.pending = None;
                        due.push((setting, pending.value));
                    }
                }
            }
        }
        due
    }

    /// Current presentation state for one control
    pub fn control(&self, setting: UiSetting) -> Option<&ControlState> {
        self.controls.get(&setting)
    }

    /// True while any control still holds an undelivered edit
    pub fn has_pending(&self) -> bool {
        self.controls.values().any(|s| s.pending.is_some())
    }
}
