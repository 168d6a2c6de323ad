//! Control orchestrator: the apply -> settle -> reload state machine
//!
//! Every apply operation walks the same states:
//!
//! ```text
//! Idle -> Sending -> Settling -> [Reloading] -> Idle      (success)
//!              \-> Recovering -> Idle                      (failure)
//! ```
//!
//! On success the device needs time to actually take the new value before
//! its read endpoints report it (the settle delay). If the apply response
//! already echoes a fresh UI-settings object inline, that echo is trusted
//! and the full reload is skipped; otherwise the status board reloads from
//! the device. On failure - transport or a logical `"error"` field - the
//! orchestrator resynchronizes the board once, best effort, then
//! re-surfaces the original error.
//!
//! The orchestrator is stateless across calls and safe to invoke
//! concurrently for different settings. Overlapping applies for the *same*
//! setting are prevented upstream by the view binder's debounce, not by
//! cancellation here.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use leafcam_codec::{clamp, UiSetting};
use leafcam_gateway::{logical_error, CameraGateway};
use leafcam_state::StatusBoard;

use crate::error::{ControlError, Result};
use crate::preset::{PresetCatalog, PresetRef, UserPreset};

/// Settle/resync delays, injectable for tests
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    /// Settle after an apply whose response echoed fresh UI settings inline
    pub echo_settle: Duration,
    /// Settle before a full reload when no echo was present
    pub full_settle: Duration,
    /// Pause before the best-effort resync after a failed apply
    pub resync_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            echo_settle: Duration::from_millis(300),
            full_settle: Duration::from_millis(600),
            resync_delay: Duration::from_millis(250),
        }
    }
}

/// Sequences apply operations against the device and keeps the status
/// board synchronized
///
/// Performs no direct UI writes: consumers learn about fresh state through
/// board subscriptions.
pub struct Controls {
    gateway: Arc<CameraGateway>,
    board: Arc<StatusBoard>,
    timing: Timing,
}

impl Controls {
    pub fn new(gateway: Arc<CameraGateway>, board: Arc<StatusBoard>) -> Self {
        Self::with_timing(gateway, board, Timing::default())
    }

    pub fn with_timing(
        gateway: Arc<CameraGateway>,
        board: Arc<StatusBoard>,
        timing: Timing,
    ) -> Self {
        Self {
            gateway,
            board,
            timing,
        }
    }

    pub(crate) fn gateway(&self) -> &CameraGateway {
        &self.gateway
    }

    pub(crate) fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn board(&self) -> &Arc<StatusBoard> {
        &self.board
    }

    // ========================================================================
    // Apply
    // ========================================================================

    /// Apply a single UI setting
    ///
    /// The value is clamped into the setting's range before the request is
    /// built; the clamped value actually sent is returned.
    pub async fn apply_one(&self, setting: UiSetting, value: f64) -> Result<f64> {
        let (min, max) = setting.range();
        let value = clamp(value, min, max);

        debug!(setting = %setting, value, "applying setting");
        let body = json!({ "ui_settings": { setting.key(): value } });

        let response = match self.gateway.post("/api/ui/settings/apply/", &body).await {
            Ok(response) => response,
            Err(err) => return Err(self.recover(err.into()).await),
        };
        if let Some(message) = logical_error(&response) {
            return Err(self.recover(ControlError::device(message)).await);
        }

        // Some firmware echoes the post-apply UI settings inline. When it
        // does, a short settle plus the echo is enough; a full reload would
        // only re-read the same document.
        let echo = response
            .get("current_ui_settings")
            .or_else(|| response.get("ui_settings"))
            .cloned();

        match echo {
            Some(echo) => {
                sleep(self.timing.echo_settle).await;
                self.board.update_ui_settings(&echo);
            }
            None => {
                sleep(self.timing.full_settle).await;
                self.board.load_from_device().await?;
            }
        }

        Ok(value)
    }

    /// Apply a preset (system or user)
    ///
    /// Presets touch many fields at once on the device, so the inline-echo
    /// shortcut never applies: always a full settle and reload.
    pub async fn apply_preset(&self, preset: &PresetRef) -> Result<()> {
        info!(%preset, "applying preset");
        let (path, body) = match preset {
            PresetRef::System(name) => ("/api/settings/preset/", json!({ "preset": name })),
            PresetRef::User(id) => ("/api/presets/load/", json!({ "preset_id": id })),
        };

        let response = match self.gateway.post(path, &body).await {
            Ok(response) => response,
            Err(err) => return Err(self.recover(err.into()).await),
        };
        if let Some(message) = logical_error(&response) {
            return Err(self.recover(ControlError::device(message)).await);
        }

        sleep(self.timing.full_settle).await;
        self.board.load_from_device().await?;
        Ok(())
    }

    /// Reset every control to its neutral state via the device's auto preset
    pub async fn reset_to_default(&self) -> Result<()> {
        self.apply_preset(&PresetRef::system("auto")).await
    }

    /// Manual refresh: reload the status board from the device
    pub async fn refresh(&self) -> Result<()> {
        self.board.load_from_device().await.map_err(Into::into)
    }

    /// Best-effort resynchronization after a failed apply
    ///
    /// Brings the board back in line with true device state, then hands the
    /// original error back for re-surfacing. A failure of the resync itself
    /// is logged and swallowed - never compounded into the surfaced error.
    async fn recover(&self, original: ControlError) -> ControlError {
        warn!(error = %original, "apply failed, resynchronizing status board");
        sleep(self.timing.resync_delay).await;
        if let Err(resync_err) = self.board.load_from_device().await {
            warn!(error = %resync_err, "resync after failed apply did not complete");
        }
        original
    }

    // ========================================================================
    // User preset CRUD
    // ========================================================================

    /// Fetch the user's saved presets plus the system preset catalog
    pub async fn list_presets(&self) -> Result<PresetCatalog> {
        let response = self.gateway.get("/api/presets/user/").await?;
        if let Some(message) = logical_error(&response) {
            return Err(ControlError::device(message));
        }
        serde_json::from_value(response)
            .map_err(|e| ControlError::Response(format!("malformed preset catalog: {e}")))
    }

    /// Save the board's current state as a named user preset
    ///
    /// The client only holds UI percentages; presets store device
    /// parameters, so the current technical settings are re-encoded with
    /// the UI values layered on top.
    pub async fn save_preset(&self, name: &str, is_default: bool) -> Result<UserPreset> {
        let bundle = self
            .board
            .technical_settings()
            .with_ui(&self.board.ui_settings());
        let settings = serde_json::to_value(&bundle)
            .map_err(|e| ControlError::Response(format!("unencodable settings bundle: {e}")))?;

        let body = json!({
            "name": name,
            "settings": settings,
            "is_default": is_default,
        });
        let response = self.gateway.post("/api/presets/save/", &body).await?;
        if let Some(message) = logical_error(&response) {
            return Err(ControlError::device(message));
        }

        let saved = response
            .get("preset")
            .cloned()
            .ok_or_else(|| ControlError::Response("save response missing preset".into()))?;
        let mut preset: UserPreset = serde_json::from_value(saved)
            .map_err(|e| ControlError::Response(format!("malformed saved preset: {e}")))?;
        if preset.settings.is_null() {
            preset.settings = settings;
        }
        info!(name, id = preset.id, "preset saved");
        Ok(preset)
    }

    /// Delete a user preset by id
    pub async fn delete_preset(&self, preset_id: i64) -> Result<()> {
        let body = json!({ "preset_id": preset_id });
        let response = self.gateway.post("/api/presets/delete/", &body).await?;
        if let Some(message) = logical_error(&response) {
            return Err(ControlError::device(message));
        }
        Ok(())
    }
}
