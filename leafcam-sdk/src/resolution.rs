//! Resolution profile discovery and switching

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::json;
use tokio::time::sleep;
use tracing::info;

use leafcam_gateway::logical_error;

use crate::controls::Controls;
use crate::error::{ControlError, Result};

/// One selectable capture profile as reported by the device
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResolutionProfile {
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub megapixels: f64,
    #[serde(default)]
    pub max_fps: u32,
    #[serde(default)]
    pub aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
struct ProfilesResponse {
    #[serde(default)]
    profiles: BTreeMap<String, ResolutionProfile>,
    #[serde(default)]
    current: Option<String>,
}

impl Controls {
    /// List the resolution profiles the camera supports, keyed by profile id
    ///
    /// Returns the map plus the currently active profile id when the device
    /// reports one.
    pub async fn resolution_profiles(
        &self,
    ) -> Result<(BTreeMap<String, ResolutionProfile>, Option<String>)> {
        let response = self.gateway().get("/api/resolution/profiles/").await?;
        if let Some(message) = logical_error(&response) {
            return Err(ControlError::device(message));
        }
        let parsed: ProfilesResponse = serde_json::from_value(response)
            .map_err(|e| ControlError::Response(format!("malformed profile list: {e}")))?;
        Ok((parsed.profiles, parsed.current))
    }

    /// Switch the camera to a different resolution profile
    ///
    /// A profile change restarts the sensor pipeline, which invalidates most
    /// of the cached state, so this always ends in a full reload.
    pub async fn change_resolution(&self, profile: &str) -> Result<()> {
        info!(profile, "changing resolution profile");
        let body = json!({ "profile": profile });
        let response = self.gateway().post("/api/resolution/change/", &body).await?;
        if let Some(message) = logical_error(&response) {
            return Err(ControlError::device(message));
        }

        sleep(self.timing().full_settle).await;
        self.board().load_from_device().await?;
        Ok(())
    }
}
