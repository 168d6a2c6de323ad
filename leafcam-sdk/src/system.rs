//! Wires gateway, status board, orchestrator, and view binder together
//!
//! Ownership flows one way:
//!
//! ```text
//! CameraSystem
//!   ├── CameraGateway      (HTTP transport)
//!   ├── StatusBoard        (authoritative state + pub/sub)
//!   ├── Controls           (apply -> settle -> reload sequencing)
//!   └── ViewBinder         (per-control presentation state)
//! ```
//!
//! Everything is injected through constructors; nothing reaches for a
//! global. The one piece of wiring [`CameraSystem::connect`] performs on
//! your behalf is the board subscription that feeds UI snapshots into the
//! binder with the programmatic-update mark set.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::{info, warn};

use leafcam_gateway::{CameraGateway, GatewayConfig};
use leafcam_state::StatusBoard;

use crate::binder::ViewBinder;
use crate::controls::{Controls, Timing};
use crate::error::{ControlError, Result};

/// Fully wired camera control stack
pub struct CameraSystem {
    gateway: Arc<CameraGateway>,
    board: Arc<StatusBoard>,
    controls: Controls,
    binder: Arc<Mutex<ViewBinder>>,
}

impl CameraSystem {
    /// Build the stack against a device and subscribe the binder to board
    /// events
    pub fn connect(config: GatewayConfig) -> Result<Self> {
        Self::connect_with_timing(config, Timing::default())
    }

    pub fn connect_with_timing(config: GatewayConfig, timing: Timing) -> Result<Self> {
        let gateway = Arc::new(CameraGateway::new(config)?);
        let board = Arc::new(StatusBoard::new(Arc::clone(&gateway)));
        let controls = Controls::with_timing(Arc::clone(&gateway), Arc::clone(&board), timing);
        let binder = Arc::new(Mutex::new(ViewBinder::new()));

        let binder_for_events = Arc::clone(&binder);
        board.subscribe(move |event| {
            if let Some(ui) = event.ui_settings() {
                if let Ok(mut binder) = binder_for_events.lock() {
                    binder.apply_snapshot(ui, Instant::now());
                }
            }
        });

        Ok(Self {
            gateway,
            board,
            controls,
            binder,
        })
    }

    /// Initial load: populate the board (and through it the binder) from
    /// the device
    pub async fn init(&self) -> Result<()> {
        info!("loading initial camera state");
        self.board.load_from_device().await.map_err(Into::into)
    }

    /// Deliver every user edit whose debounce window has expired
    ///
    /// Applies run sequentially; on the first failure the remaining due
    /// edits are still attempted and the first error is returned at the
    /// end, after the orchestrator's own resync has already run.
    pub async fn flush_edits(&self) -> Result<()> {
        let due = match self.binder.lock() {
            Ok(mut binder) => binder.poll(Instant::now()),
            Err(_) => Vec::new(),
        };

        let mut first_error: Option<ControlError> = None;
        for (setting, value) in due {
            if let Err(err) = self.controls.apply_one(setting, value).await {
                warn!(setting = %setting, error = %err, "deferred edit failed to apply");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn gateway(&self) -> &Arc<CameraGateway> {
        &self.gateway
    }

    pub fn board(&self) -> &Arc<StatusBoard> {
        &self.board
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn binder(&self) -> &Arc<Mutex<ViewBinder>> {
        &self.binder
    }
}
