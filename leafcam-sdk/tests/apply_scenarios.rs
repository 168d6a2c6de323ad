//! End-to-end apply flows against a mock device

use std::sync::Arc;
use std::time::{Duration, Instant};

use mockito::Matcher;
use serde_json::json;

use leafcam_codec::UiSetting;
use leafcam_gateway::{CameraGateway, GatewayConfig};
use leafcam_sdk::{CameraSystem, ControlError, Controls, PresetRef, Timing};
use leafcam_state::{BoardTiming, StatusBoard};

const ECHO_SETTLE: Duration = Duration::from_millis(20);
const FULL_SETTLE: Duration = Duration::from_millis(60);
const RESYNC_DELAY: Duration = Duration::from_millis(20);

fn test_timing() -> Timing {
    Timing {
        echo_settle: ECHO_SETTLE,
        full_settle: FULL_SETTLE,
        resync_delay: RESYNC_DELAY,
    }
}

fn stack_for(server: &mockito::ServerGuard) -> (Arc<StatusBoard>, Controls) {
    let gateway = Arc::new(
        CameraGateway::new(GatewayConfig {
            base_url: server.url(),
            csrf_token: "test-token".into(),
            ..GatewayConfig::default()
        })
        .unwrap(),
    );
    let board = Arc::new(StatusBoard::with_timing(
        Arc::clone(&gateway),
        BoardTiming {
            inter_fetch_settle: Duration::from_millis(10),
        },
    ));
    let controls = Controls::with_timing(gateway, Arc::clone(&board), test_timing());
    (board, controls)
}

/// Mount the four status endpoints a full reload walks, each expected
/// exactly `hits` times.
async fn mock_reload(server: &mut mockito::ServerGuard, hits: usize) -> Vec<mockito::Mock> {
    let mut mocks = Vec::new();
    mocks.push(
        server
            .mock("GET", "/api/settings/")
            .with_body(r#"{"state": "streaming", "mode": "photo", "preset": "auto"}"#)
            .expect(hits)
            .create_async()
            .await,
    );
    mocks.push(
        server
            .mock("GET", "/api/settings/camera/")
            .with_body(r#"{"settings": {"Sharpness": 1.0, "Contrast": 1.2}}"#)
            .expect(hits)
            .create_async()
            .await,
    );
    mocks.push(
        server
            .mock("GET", "/api/ui/settings/current/")
            .with_body(r#"{"ui_settings": {"brightness": 15.0, "zoom": 150.0}}"#)
            .expect(hits)
            .create_async()
            .await,
    );
    mocks.push(
        server
            .mock("GET", "/api/resolution/")
            .with_body(r#"{"resolution_main": [1920, 1080], "profile_name": "full_hd"}"#)
            .expect(hits)
            .create_async()
            .await,
    );
    mocks
}

#[tokio::test]
async fn inline_echo_skips_the_full_reload() {
    let mut server = mockito::Server::new_async().await;
    let apply = server
        .mock("POST", "/api/ui/settings/apply/")
        .match_header("x-csrftoken", "test-token")
        .match_body(Matcher::Json(json!({ "ui_settings": { "brightness": 40.0 } })))
        .with_body(r#"{"success": true, "current_ui_settings": {"brightness": 40.0}}"#)
        .create_async()
        .await;
    let reload = mock_reload(&mut server, 0).await;

    let (board, controls) = stack_for(&server);
    let sent = controls
        .apply_one(UiSetting::Brightness, 40.0)
        .await
        .unwrap();

    assert_eq!(sent, 40.0);
    assert_eq!(board.ui_settings().brightness, 40.0);
    apply.assert_async().await;
    for mock in reload {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn missing_echo_triggers_settle_then_full_reload() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/ui/settings/apply/")
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;
    let reload = mock_reload(&mut server, 1).await;

    let (board, controls) = stack_for(&server);
    let started = Instant::now();
    controls.apply_one(UiSetting::Zoom, 150.0).await.unwrap();

    assert!(started.elapsed() >= FULL_SETTLE);
    // fresh state came from the reload endpoints
    assert_eq!(board.ui_settings().zoom, 150.0);
    assert_eq!(board.ui_settings().brightness, 15.0);
    assert_eq!(board.system_info().state, "streaming");
    for mock in reload {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn out_of_range_values_are_clamped_before_sending() {
    let mut server = mockito::Server::new_async().await;
    let apply = server
        .mock("POST", "/api/ui/settings/apply/")
        .match_body(Matcher::Json(json!({ "ui_settings": { "brightness": 100.0 } })))
        .with_body(r#"{"success": true, "current_ui_settings": {"brightness": 100.0}}"#)
        .create_async()
        .await;

    let (board, controls) = stack_for(&server);
    let sent = controls
        .apply_one(UiSetting::Brightness, 500.0)
        .await
        .unwrap();

    assert_eq!(sent, 100.0);
    assert_eq!(board.ui_settings().brightness, 100.0);
    apply.assert_async().await;
}

#[tokio::test]
async fn device_error_resyncs_once_then_reraises() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/ui/settings/apply/")
        .with_body(r#"{"error": "camera busy"}"#)
        .create_async()
        .await;
    let resync = mock_reload(&mut server, 1).await;

    let (board, controls) = stack_for(&server);
    let err = controls
        .apply_one(UiSetting::Contrast, 120.0)
        .await
        .unwrap_err();

    assert_eq!(err.device_message(), Some("camera busy"));
    // the board reflects true device state, not the rejected edit
    assert_eq!(board.ui_settings().contrast, 100.0);
    assert_eq!(board.ui_settings().brightness, 15.0);
    for mock in resync {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn transport_error_also_resyncs_and_surfaces_the_original() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/ui/settings/apply/")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;
    let resync = mock_reload(&mut server, 1).await;

    let (_board, controls) = stack_for(&server);
    let err = controls
        .apply_one(UiSetting::Saturation, 90.0)
        .await
        .unwrap_err();

    match err {
        ControlError::Transport(gateway_err) => assert_eq!(gateway_err.status(), Some(500)),
        other => panic!("expected transport error, got {other}"),
    }
    for mock in resync {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn failed_resync_still_surfaces_the_apply_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/api/ui/settings/apply/")
        .with_body(r#"{"error": "camera busy"}"#)
        .create_async()
        .await;
    // every reload endpoint down as well
    server
        .mock("GET", Matcher::Any)
        .with_status(503)
        .with_body("down")
        .create_async()
        .await;

    let (_board, controls) = stack_for(&server);
    let err = controls
        .apply_one(UiSetting::Sharpness, 150.0)
        .await
        .unwrap_err();

    // the original logical error wins over the resync failure
    assert_eq!(err.device_message(), Some("camera busy"));
}

#[tokio::test]
async fn preset_apply_always_reloads() {
    let mut server = mockito::Server::new_async().await;
    let apply = server
        .mock("POST", "/api/settings/preset/")
        .match_body(Matcher::Json(json!({ "preset": "daylight" })))
        // even with an inline echo a preset goes through the full reload
        .with_body(r#"{"success": true, "current_ui_settings": {"brightness": 55.0}}"#)
        .create_async()
        .await;
    let reload = mock_reload(&mut server, 1).await;

    let (board, controls) = stack_for(&server);
    let started = Instant::now();
    controls
        .apply_preset(&PresetRef::system("daylight"))
        .await
        .unwrap();

    assert!(started.elapsed() >= FULL_SETTLE);
    assert_eq!(board.ui_settings().brightness, 15.0);
    apply.assert_async().await;
    for mock in reload {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn user_preset_loads_by_id() {
    let mut server = mockito::Server::new_async().await;
    let apply = server
        .mock("POST", "/api/presets/load/")
        .match_body(Matcher::Json(json!({ "preset_id": 7 })))
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;
    mock_reload(&mut server, 1).await;

    let (_board, controls) = stack_for(&server);
    controls.apply_preset(&PresetRef::User(7)).await.unwrap();
    apply.assert_async().await;
}

#[tokio::test]
async fn debounced_edits_flush_as_a_single_apply() {
    let mut server = mockito::Server::new_async().await;
    let apply = server
        .mock("POST", "/api/ui/settings/apply/")
        .match_body(Matcher::Json(json!({ "ui_settings": { "sharpness": 150.0 } })))
        .with_body(r#"{"success": true, "current_ui_settings": {"sharpness": 150.0}}"#)
        .expect(1)
        .create_async()
        .await;

    let system = CameraSystem::connect_with_timing(
        GatewayConfig {
            base_url: server.url(),
            ..GatewayConfig::default()
        },
        test_timing(),
    )
    .unwrap();

    {
        let mut binder = system.binder().lock().unwrap();
        let now = Instant::now();
        binder.input(UiSetting::Sharpness, 120.0, now);
        binder.input(UiSetting::Sharpness, 150.0, now);
    }
    tokio::time::sleep(Duration::from_millis(350)).await;
    system.flush_edits().await.unwrap();

    assert_eq!(system.board().ui_settings().sharpness, 150.0);
    apply.assert_async().await;
}
