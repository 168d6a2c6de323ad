//! Preview capture and on-device image analysis
//!
//! Both operations run the camera pipeline end to end and can take tens of
//! seconds, so they go through the gateway's slow-call path with its
//! extended timeout.

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use leafcam_gateway::logical_error;

use crate::controls::Controls;
use crate::error::{ControlError, Result};

/// Result of a preview capture
#[derive(Debug, Clone, Deserialize)]
pub struct CapturePreview {
    pub filename: String,
    /// Browser-fetchable path for the captured frame
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Exposure and focus diagnostics for a captured frame
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisReport {
    pub filename: String,
    #[serde(default)]
    pub sharpness_score: f64,
    #[serde(default)]
    pub brightness_mean: f64,
    #[serde(default)]
    pub overexposed_ratio: f64,
    #[serde(default)]
    pub underexposed_ratio: f64,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl Controls {
    /// Capture a single preview frame with the current settings
    pub async fn capture_preview(&self) -> Result<CapturePreview> {
        info!("capturing preview frame");
        let response = self
            .gateway()
            .post_slow("/capture/preview/", &json!({}))
            .await?;
        if let Some(message) = logical_error(&response) {
            return Err(ControlError::device(message));
        }
        serde_json::from_value(response)
            .map_err(|e| ControlError::Response(format!("malformed capture response: {e}")))
    }

    /// Run the device-side analysis pass over a previously captured frame
    pub async fn analyze_image(&self, filename: &str) -> Result<AnalysisReport> {
        info!(filename, "analyzing captured frame");
        let body = json!({ "filename": filename });
        let response = self.gateway().post_slow("/capture/analyze/", &body).await?;
        if let Some(message) = logical_error(&response) {
            return Err(ControlError::device(message));
        }
        serde_json::from_value(response)
            .map_err(|e| ControlError::Response(format!("malformed analysis response: {e}")))
    }
}
