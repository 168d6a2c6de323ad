use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::GatewayError;
use crate::Result;

/// Header carrying the anti-forgery token on every request
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Gateway construction parameters
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Root of the device API, e.g. `http://192.168.1.42:8000`
    pub base_url: String,
    /// Anti-forgery token attached to every call
    pub csrf_token: String,
    /// Hard timeout for ordinary settings calls
    pub request_timeout: Duration,
    /// Hard timeout for detection-class calls (capture, analyze)
    pub detect_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            csrf_token: String::new(),
            request_timeout: Duration::from_secs(10),
            detect_timeout: Duration::from_secs(30),
        }
    }
}

/// Async HTTP JSON client for the camera host
///
/// Cheap to clone; all clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct CameraGateway {
    http: reqwest::Client,
    base_url: Url,
    csrf_token: String,
    request_timeout: Duration,
    detect_timeout: Duration,
}

impl CameraGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            csrf_token: config.csrf_token,
            request_timeout: config.request_timeout,
            detect_timeout: config.detect_timeout,
        })
    }

    /// GET a settings-class endpoint
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, None, self.request_timeout)
            .await
    }

    /// POST a JSON body to a settings-class endpoint
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, Some(body), self.request_timeout)
            .await
    }

    /// POST under the detection timeout (capture / analyze calls)
    pub async fn post_slow(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, Some(body), self.detect_timeout)
            .await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<Value> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;

        debug!(%method, %url, "device request");

        let mut request = self
            .http
            .request(method, url.clone())
            .timeout(timeout)
            .header(CSRF_HEADER, &self.csrf_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout(timeout)
            } else {
                GatewayError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), "device returned error status");
            return Err(GatewayError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

/// Extract a logical error reported inside a 2xx JSON body
///
/// The device signals failures like "camera busy" with HTTP 200 and an
/// `"error"` string field. The gateway hands such bodies through unchanged;
/// callers test them with this.
pub fn logical_error(body: &Value) -> Option<&str> {
    body.get("error")
        .and_then(Value::as_str)
        .filter(|msg| !msg.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gateway_for(server: &mockito::ServerGuard) -> CameraGateway {
        CameraGateway::new(GatewayConfig {
            base_url: server.url(),
            csrf_token: "test-token".into(),
            ..GatewayConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn get_attaches_csrf_and_content_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/settings/")
            .match_header("x-csrftoken", "test-token")
            .match_header("content-type", "application/json")
            .with_body(r#"{"state": "running"}"#)
            .create_async()
            .await;

        let gateway = gateway_for(&server);
        let body = gateway.get("/api/settings/").await.unwrap();

        assert_eq!(body["state"], "running");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn post_sends_the_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/ui/settings/apply/")
            .match_body(mockito::Matcher::Json(json!({
                "ui_settings": {"zoom": 150.0}
            })))
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let gateway = gateway_for(&server);
        let body = gateway
            .post("/api/ui/settings/apply/", &json!({"ui_settings": {"zoom": 150.0}}))
            .await
            .unwrap();

        assert_eq!(body["success"], true);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_2xx_surfaces_status_and_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/settings/camera/")
            .with_status(503)
            .with_body("camera restarting")
            .create_async()
            .await;

        let gateway = gateway_for(&server);
        let err = gateway.get("/api/settings/camera/").await.unwrap_err();

        match err {
            GatewayError::Http { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "camera restarting");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_field_in_2xx_body_is_not_a_gateway_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/resolution/")
            .with_body(r#"{"error": "camera busy"}"#)
            .create_async()
            .await;

        let gateway = gateway_for(&server);
        let body = gateway.get("/api/resolution/").await.unwrap();

        assert_eq!(logical_error(&body), Some("camera busy"));
    }

    #[tokio::test]
    async fn unparseable_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/settings/")
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let gateway = gateway_for(&server);
        let err = gateway.get("/api/settings/").await.unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn logical_error_ignores_empty_and_non_string_fields() {
        assert_eq!(logical_error(&json!({"error": ""})), None);
        assert_eq!(logical_error(&json!({"error": 5})), None);
        assert_eq!(logical_error(&json!({"ok": true})), None);
        assert_eq!(logical_error(&json!({"error": "boom"})), Some("boom"));
    }

    /// A socket that accepts connections but never answers, so every
    /// request runs into its hard timeout.
    fn silent_server() -> (std::net::TcpListener, String) {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        (listener, base_url)
    }

    #[tokio::test]
    async fn settings_call_fails_with_the_request_timeout() {
        let (_listener, base_url) = silent_server();
        let gateway = CameraGateway::new(GatewayConfig {
            base_url,
            request_timeout: Duration::from_millis(100),
            detect_timeout: Duration::from_millis(250),
            ..GatewayConfig::default()
        })
        .unwrap();

        let started = std::time::Instant::now();
        let err = gateway.get("/api/settings/").await.unwrap_err();

        assert!(started.elapsed() >= Duration::from_millis(100));
        match err {
            GatewayError::Timeout(window) => {
                assert_eq!(window, Duration::from_millis(100));
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn detection_call_runs_under_the_longer_timeout() {
        let (_listener, base_url) = silent_server();
        let gateway = CameraGateway::new(GatewayConfig {
            base_url,
            request_timeout: Duration::from_millis(100),
            detect_timeout: Duration::from_millis(250),
            ..GatewayConfig::default()
        })
        .unwrap();

        let started = std::time::Instant::now();
        let err = gateway
            .post_slow("/capture/preview/", &json!({}))
            .await
            .unwrap_err();

        // the slow path outlives the settings timeout before giving up
        assert!(started.elapsed() >= Duration::from_millis(250));
        match err {
            GatewayError::Timeout(window) => {
                assert_eq!(window, Duration::from_millis(250));
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[test]
    fn invalid_base_url_is_rejected_at_construction() {
        let result = CameraGateway::new(GatewayConfig {
            base_url: "not a url".into(),
            ..GatewayConfig::default()
        });
        assert!(matches!(result, Err(GatewayError::InvalidUrl(_))));
    }
}
