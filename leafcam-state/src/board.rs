//! The status board: authoritative mirror of device state
//!
//! All shared mutable state in the SDK lives behind this type. Mutation
//! happens only through the `update_*` methods (fed by decoded device
//! responses); reads hand out clones, never references into the live
//! snapshot.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use leafcam_codec::UiSettings;
use leafcam_gateway::{logical_error, CameraGateway, GatewayError};

use crate::event::StatusEvent;
use crate::model::{ResolutionInfo, StatusSnapshot, SystemInfo, TechnicalSettings};

type Listener = Arc<dyn Fn(&StatusEvent) + Send + Sync>;

/// Timing knobs for `load_from_device`, injectable for tests
#[derive(Debug, Clone, Copy)]
pub struct BoardTiming {
    /// Mandatory pause between fetching technical settings and UI settings,
    /// giving the device time to settle after a preceding write.
    pub inter_fetch_settle: Duration,
}

impl Default for BoardTiming {
    fn default() -> Self {
        Self {
            inter_fetch_settle: Duration::from_millis(400),
        }
    }
}

/// Single source of truth for remote camera state
///
/// Constructed once at application start and passed by handle to every
/// consumer - deliberately not a global. Refresh is pull-based; see the
/// crate docs.
pub struct StatusBoard {
    gateway: Arc<CameraGateway>,
    snapshot: RwLock<StatusSnapshot>,
    listeners: RwLock<Vec<Listener>>,
    timing: BoardTiming,
}

impl StatusBoard {
    pub fn new(gateway: Arc<CameraGateway>) -> Self {
        Self::with_timing(gateway, BoardTiming::default())
    }

    pub fn with_timing(gateway: Arc<CameraGateway>, timing: BoardTiming) -> Self {
        Self {
            gateway,
            snapshot: RwLock::new(StatusSnapshot::default()),
            listeners: RwLock::new(Vec::new()),
            timing,
        }
    }

    // ========================================================================
    // Subscription
    // ========================================================================

    /// Register a listener invoked on every board update
    ///
    /// Listener failures are isolated: a panicking listener is logged and
    /// skipped, later listeners still run. Listeners may call back into the
    /// board (including `subscribe` and the `update_*` methods); a listener
    /// registered during a notification only sees subsequent events.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&StatusEvent) + Send + Sync + 'static,
    {
        if let Ok(mut listeners) = self.listeners.write() {
            listeners.push(Arc::new(listener));
        }
    }

    fn notify(&self, event: StatusEvent) {
        // Snapshot the registry before invoking anything: a listener is
        // allowed to call back into the board (subscribe or update_*), which
        // must not deadlock against a held guard.
        let listeners: Vec<Listener> = match self.listeners.read() {
            Ok(listeners) => listeners.clone(),
            Err(_) => {
                warn!("listener registry poisoned, skipping notification");
                return;
            }
        };
        for listener in listeners.iter() {
            if catch_unwind(AssertUnwindSafe(|| listener(&event))).is_err() {
                warn!(kind = ?event.kind(), "status listener panicked");
            }
        }
    }

    // ========================================================================
    // Reading (defensive copies)
    // ========================================================================

    pub fn snapshot(&self) -> StatusSnapshot {
        self.snapshot
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn technical_settings(&self) -> TechnicalSettings {
        self.snapshot
            .read()
            .map(|s| s.technical.clone())
            .unwrap_or_default()
    }

    pub fn ui_settings(&self) -> UiSettings {
        self.snapshot
            .read()
            .map(|s| s.ui)
            .unwrap_or_default()
    }

    pub fn system_info(&self) -> SystemInfo {
        self.snapshot
            .read()
            .map(|s| s.system.clone())
            .unwrap_or_default()
    }

    pub fn resolution_info(&self) -> ResolutionInfo {
        self.snapshot
            .read()
            .map(|s| s.resolution.clone())
            .unwrap_or_default()
    }

    // ========================================================================
    // Writing (decoded device responses only)
    // ========================================================================

    /// Merge a partial technical-settings payload and publish
    pub fn update_technical_settings(&self, raw: &Value) {
        let technical = {
            let mut snapshot = match self.snapshot.write() {
                Ok(s) => s,
                Err(_) => return,
            };
            snapshot.technical.merge(raw);
            snapshot.technical.clone()
        };
        debug!(?technical, "technical settings updated");
        self.notify(StatusEvent::Technical(technical));
    }

    /// Merge a partial UI-settings payload, normalize, and publish
    ///
    /// Always publishes, even when nothing numerically changed: the device
    /// may echo identical values after a write that still requires the view
    /// layer to re-render (e.g. clearing a pending indicator).
    pub fn update_ui_settings(&self, raw: &Value) {
        let ui = {
            let mut snapshot = match self.snapshot.write() {
                Ok(s) => s,
                Err(_) => return,
            };
            snapshot.ui = snapshot.ui.merged(raw);
            snapshot.ui
        };
        debug!(?ui, "ui settings updated");
        self.notify(StatusEvent::Ui(ui));
    }

    /// Merge a partial system-info payload and publish
    pub fn update_system_info(&self, raw: &Value) {
        let system = {
            let mut snapshot = match self.snapshot.write() {
                Ok(s) => s,
                Err(_) => return,
            };
            snapshot.system.merge(raw);
            snapshot.system.clone()
        };
        self.notify(StatusEvent::System(system));
    }

    /// Merge a partial resolution payload and publish
    pub fn update_resolution_info(&self, raw: &Value) {
        let resolution = {
            let mut snapshot = match self.snapshot.write() {
                Ok(s) => s,
                Err(_) => return,
            };
            snapshot.resolution.merge(raw);
            snapshot.resolution.clone()
        };
        self.notify(StatusEvent::Resolution(resolution));
    }

    // ========================================================================
    // Refresh
    // ========================================================================

    /// Reload the whole snapshot from the device
    ///
    /// Fetches the four endpoints strictly in sequence: system info,
    /// technical settings, (mandatory settle pause), UI settings,
    /// resolution info. A failing endpoint leaves its sub-section stale and
    /// the remaining fetches still run; the first transport error is
    /// returned once all four have completed, so callers that only care
    /// about specific sections may ignore it. Publishes an `All` event at
    /// the end regardless.
    pub async fn load_from_device(&self) -> Result<(), GatewayError> {
        debug!("loading status from device");
        let mut first_error: Option<GatewayError> = None;

        match self.gateway.get("/api/settings/").await {
            Ok(body) => {
                if logical_error(&body).is_none() {
                    self.update_system_info(&body);
                }
            }
            Err(err) => {
                warn!(error = %err, "system info fetch failed");
                first_error.get_or_insert(err);
            }
        }

        match self.gateway.get("/api/settings/camera/").await {
            Ok(body) => {
                if logical_error(&body).is_none() {
                    // some firmware nests the document under "settings"
                    let settings = body.get("settings").unwrap_or(&body);
                    self.update_technical_settings(settings);
                }
            }
            Err(err) => {
                warn!(error = %err, "technical settings fetch failed");
                first_error.get_or_insert(err);
            }
        }

        // The device needs time to apply a preceding write before its UI
        // endpoint reports stable values. This pause is mandatory.
        tokio::time::sleep(self.timing.inter_fetch_settle).await;

        match self.gateway.get("/api/ui/settings/current/").await {
            Ok(body) => {
                if logical_error(&body).is_none() {
                    let ui = body.get("ui_settings").unwrap_or(&body);
                    self.update_ui_settings(ui);
                }
            }
            Err(err) => {
                warn!(error = %err, "ui settings fetch failed");
                first_error.get_or_insert(err);
            }
        }

        match self.gateway.get("/api/resolution/").await {
            Ok(body) => {
                if logical_error(&body).is_none() && body.get("resolution_main").is_some() {
                    self.update_resolution_info(&body);
                }
            }
            Err(err) => {
                warn!(error = %err, "resolution fetch failed");
                first_error.get_or_insert(err);
            }
        }

        self.notify(StatusEvent::All(self.snapshot()));

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Tests (in-memory; network paths are covered in tests/board_reload.rs)
// ============================================================================
