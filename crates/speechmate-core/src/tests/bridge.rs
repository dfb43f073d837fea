use crate::{
    BridgeServer, ClipboardSink, HealthCheckResponse, PartialSettings, RecordingEvent, Settings,
    SettingsStore, ShellState,
    bridge::{host_allowed, origin_allowed},
    router,
    tests::support::{
        BrokenClipboard, RecordingClipboard, TEST_HOST, TEST_ORIGIN, bridge_state, temp_shell,
    },
};

use std::{fs, sync::Arc, time::Duration};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{
        HeaderMap, HeaderValue, Request, StatusCode,
        header::{CONTENT_TYPE, HOST, ORIGIN},
    },
    response::Response,
};
use futures_util::StreamExt;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message as WsMessage,
};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn test_router(shell: Arc<ShellState>, clipboard: Arc<dyn ClipboardSink>) -> Router {
    let (_shutdown_tx, state) = bridge_state(shell, clipboard);
    router(state)
}

#[allow(clippy::unwrap_used)]
fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(HOST, TEST_HOST)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(clippy::unwrap_used)]
fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(HOST, TEST_HOST)
        .body(Body::empty())
        .unwrap()
}

#[allow(clippy::unwrap_used)]
async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// WHAT: get-config returns the in-memory record
/// WHY: The settings page populates itself from it on mount
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_shell_when_getting_config_then_current_settings_returned() {
    // Given: A shell with default settings
    let (_dir, shell) = temp_shell();
    let app = test_router(shell, Arc::new(RecordingClipboard::default()));

    // When: GET /api/config
    let response = app.oneshot(empty_request("GET", "/api/config")).await.unwrap();

    // Then: The default record
    assert_eq!(response.status(), StatusCode::OK);
    let settings: Settings = body_json(response).await;
    assert_eq!(settings, Settings::default());
}

/// WHAT: save-config merges, persists and answers true
/// WHY: Edits from the UI become the new source of truth
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_partial_body_when_saving_config_then_merged_and_persisted() {
    // Given: A shell backed by a temp directory
    let (dir, shell) = temp_shell();
    let app = test_router(Arc::clone(&shell), Arc::new(RecordingClipboard::default()));

    // When: POST /api/config with only the API key
    let response = app
        .oneshot(json_request("POST", "/api/config", r#"{"api_key":"X"}"#))
        .await
        .unwrap();

    // Then: true, and the merged record is in memory and on disk
    assert_eq!(response.status(), StatusCode::OK);
    let saved: bool = body_json(response).await;
    assert!(saved);

    let expected = Settings {
        api_key: "X".to_string(),
        ..Settings::default()
    };
    assert_eq!(shell.settings().await, expected);
    assert_eq!(SettingsStore::in_dir(dir.path()).load().unwrap(), expected);
}

/// WHAT: save-config reports a write failure as 500 with an error body
/// WHY: The UI shows a failure state instead of a false confirmation
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_unwritable_store_when_saving_config_then_internal_error() {
    // Given: A store whose directory is a regular file
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let shell = Arc::new(ShellState::new(
        SettingsStore::in_dir(&blocker),
        Settings::default(),
    ));
    let app = test_router(Arc::clone(&shell), Arc::new(RecordingClipboard::default()));

    // When: Saving
    let body = serde_json::to_string(&PartialSettings {
        base_url: Some("http://elsewhere".to_string()),
        ..PartialSettings::default()
    })
    .unwrap();
    let response = app
        .oneshot(json_request("POST", "/api/config", &body))
        .await
        .unwrap();

    // Then: 500 with an error message, record unchanged
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error: serde_json::Value = body_json(response).await;
    assert!(error["error"].as_str().is_some());
    assert_eq!(shell.settings().await, Settings::default());
}

/// WHAT: set-recording flips the flag and notifies subscribers
/// WHY: The UI can end or start a session explicitly
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_subscriber_when_setting_recording_then_no_content_and_event() {
    // Given: A subscriber on the shell
    let (_dir, shell) = temp_shell();
    let mut events = shell.subscribe();
    let app = test_router(Arc::clone(&shell), Arc::new(RecordingClipboard::default()));

    // When: POST /api/recording
    let response = app
        .oneshot(json_request("POST", "/api/recording", r#"{"recording":true}"#))
        .await
        .unwrap();

    // Then: 204 and one event
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(events.try_recv().unwrap(), RecordingEvent { recording: true });
    assert!(shell.is_recording().await);
}

/// WHAT: Malformed bodies are rejected before reaching the shell
/// WHY: The bridge only accepts the typed operations it defines
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_malformed_body_when_setting_recording_then_client_error() {
    // Given: A shell
    let (_dir, shell) = temp_shell();
    let app = test_router(Arc::clone(&shell), Arc::new(RecordingClipboard::default()));

    // When: Sending a string instead of a boolean
    let response = app
        .oneshot(json_request("POST", "/api/recording", r#"{"recording":"yes"}"#))
        .await
        .unwrap();

    // Then: Client error and the flag untouched
    assert!(response.status().is_client_error());
    assert!(!shell.is_recording().await);
}

/// WHAT: Operations outside the route table do not exist
/// WHY: The set of bridge operations is closed
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_unknown_operation_when_calling_then_not_found() {
    let (_dir, shell) = temp_shell();
    let app = test_router(shell, Arc::new(RecordingClipboard::default()));

    let response = app
        .oneshot(json_request("POST", "/api/quit", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// WHAT: write-clipboard hands the text to the clipboard sink
/// WHY: The UI has no clipboard handle of its own
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_text_when_writing_clipboard_then_sink_receives_it() {
    // Given: A recording clipboard
    let (_dir, shell) = temp_shell();
    let clipboard = Arc::new(RecordingClipboard::default());
    let app = test_router(shell, Arc::clone(&clipboard) as Arc<dyn ClipboardSink>);

    // When: POST /api/clipboard
    let response = app
        .oneshot(json_request("POST", "/api/clipboard", r#"{"text":"你好"}"#))
        .await
        .unwrap();

    // Then: 204 and the text was written
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(*clipboard.writes.lock().unwrap(), vec!["你好".to_string()]);
}

/// WHAT: A clipboard failure is reported as 500
/// WHY: Side-effect failures are not silently swallowed
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_broken_clipboard_when_writing_then_internal_error() {
    let (_dir, shell) = temp_shell();
    let app = test_router(shell, Arc::new(BrokenClipboard));

    let response = app
        .oneshot(json_request("POST", "/api/clipboard", r#"{"text":"x"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

/// WHAT: test-connection checks the address sent by the page, not the saved one
/// WHY: Users test a newly typed host before saving it
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_unsaved_base_url_when_testing_connection_then_that_host_checked() {
    // Given: A healthy host that is not the saved base URL
    let host = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&host)
        .await;
    let (_dir, shell) = temp_shell();
    shell
        .save_settings(PartialSettings {
            base_url: Some("http://127.0.0.1:9".to_string()),
            ..PartialSettings::default()
        })
        .await
        .unwrap();
    let app = test_router(Arc::clone(&shell), Arc::new(RecordingClipboard::default()));

    // When: POST /api/health-check with the typed address
    let body = format!(r#"{{"base_url":"{}"}}"#, host.uri());
    let response = app
        .oneshot(json_request("POST", "/api/health-check", &body))
        .await
        .unwrap();

    // Then: ok, and the saved record is untouched
    assert_eq!(response.status(), StatusCode::OK);
    let result: HealthCheckResponse = body_json(response).await;
    assert!(result.ok);
    assert_eq!(shell.settings().await.base_url, "http://127.0.0.1:9");
}

/// WHAT: test-connection without an address is rejected
/// WHY: The operation has a typed body like every other bridge operation
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_no_body_when_testing_connection_then_client_error() {
    let (_dir, shell) = temp_shell();
    let app = test_router(shell, Arc::new(RecordingClipboard::default()));

    let response = app
        .oneshot(empty_request("POST", "/api/health-check"))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

/// WHAT: A request for a foreign host name is refused before any handler runs
/// WHY: A rebound DNS name must not let another page read the API key
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_rebound_host_when_getting_config_then_forbidden_without_secrets() {
    // Given: A stored API key
    let (_dir, shell) = temp_shell();
    shell
        .save_settings(PartialSettings {
            api_key: Some("sk-secret".to_string()),
            ..PartialSettings::default()
        })
        .await
        .unwrap();
    let app = test_router(shell, Arc::new(RecordingClipboard::default()));

    // When: GET /api/config addressed to another name on the same port
    let request = Request::builder()
        .method("GET")
        .uri("/api/config")
        .header(HOST, "rebind.attacker.example:7878")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    // Then: 403 and the key is not in the body
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(!String::from_utf8_lossy(&bytes).contains("sk-secret"));
}

/// WHAT: A request from another page's origin is refused, even a simple one
/// WHY: CORS only hides responses; the request itself must not run
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_foreign_origin_when_setting_recording_then_forbidden_and_flag_untouched() {
    // Given: A shell
    let (_dir, shell) = temp_shell();
    let app = test_router(Arc::clone(&shell), Arc::new(RecordingClipboard::default()));

    // When: Another page posts to /api/recording
    let request = Request::builder()
        .method("POST")
        .uri("/api/recording")
        .header(HOST, TEST_HOST)
        .header(ORIGIN, "https://evil.example")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"recording":true}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    // Then: 403 and nothing changed
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(!shell.is_recording().await);
}

/// WHAT: The event stream refuses other pages' origins
/// WHY: Browsers never apply CORS to WebSocket upgrades
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_foreign_origin_when_opening_event_stream_then_forbidden() {
    let (_dir, shell) = temp_shell();
    let app = test_router(shell, Arc::new(RecordingClipboard::default()));

    let request = Request::builder()
        .method("GET")
        .uri("/api/events")
        .header(HOST, TEST_HOST)
        .header(ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// WHAT: Requests from the settings page's own origin pass the guard
/// WHY: The page posts with an Origin header on every save
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_own_origin_when_saving_config_then_ok() {
    let (_dir, shell) = temp_shell();
    let app = test_router(shell, Arc::new(RecordingClipboard::default()));

    let request = Request::builder()
        .method("POST")
        .uri("/api/config")
        .header(HOST, TEST_HOST)
        .header(ORIGIN, TEST_ORIGIN)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"api_key":"X"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// WHAT: The settings page is served at the root
/// WHY: The settings window loads the UI from the bridge itself
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_bridge_when_requesting_root_then_settings_page() {
    let (_dir, shell) = temp_shell();
    let app = test_router(shell, Arc::new(RecordingClipboard::default()));

    let response = app.oneshot(empty_request("GET", "/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("SpeechMate"));
    assert!(html.contains("/api/events"));
}

/// WHAT: Host and origin checks accept only the bridge's own authority
/// WHY: Other web pages must not observe or drive the shell
#[test]
fn given_headers_when_checking_access_then_only_own_host_and_origin_allowed() {
    let hosts = vec![HeaderValue::from_static(TEST_HOST)];
    let origins = vec![HeaderValue::from_static(TEST_ORIGIN)];

    let mut own = HeaderMap::new();
    own.insert(HOST, HeaderValue::from_static(TEST_HOST));
    own.insert(ORIGIN, HeaderValue::from_static(TEST_ORIGIN));
    let mut foreign = HeaderMap::new();
    foreign.insert(HOST, HeaderValue::from_static("evil.example:7878"));
    foreign.insert(ORIGIN, HeaderValue::from_static("https://evil.example"));

    assert!(host_allowed(&own, &hosts));
    assert!(origin_allowed(&own, &origins));
    assert!(!host_allowed(&foreign, &hosts));
    assert!(!origin_allowed(&foreign, &origins));
    assert!(!host_allowed(&HeaderMap::new(), &hosts));
    assert!(origin_allowed(&HeaderMap::new(), &origins));
}

/// WHAT: The bridge keeps serving until shutdown, then stops cleanly
/// WHY: Only the tray quit action ends the shell
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_running_server_when_shutdown_signalled_then_serve_returns() {
    // Given: A bound, serving bridge
    let (_dir, shell) = temp_shell();
    let (shutdown_tx, state) = bridge_state(shell, Arc::new(RecordingClipboard::default()));
    let server = BridgeServer::bind(0).await.unwrap();
    let url = server.url();
    let serve = tokio::spawn(server.serve(state, shutdown_tx.subscribe()));

    // When: A client uses it, then quit is signalled
    let settings: Settings = reqwest::get(format!("{}api/config", url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    shutdown_tx.send(true).unwrap();

    // Then: It answered, then stopped without error
    assert_eq!(settings, Settings::default());
    let result = tokio::time::timeout(Duration::from_secs(5), serve)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

type EventSocket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

#[allow(clippy::unwrap_used)]
async fn next_event(socket: &mut EventSocket) -> RecordingEvent {
    let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    serde_json::from_str(message.to_text().unwrap()).unwrap()
}

/// WHAT: The event stream sends a snapshot, then every change in order, and
/// closing it leaves the bridge serving
/// WHY: Closing the settings window only hides it; quit is tray-only
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_event_stream_when_flag_changes_and_window_closes_then_bridge_keeps_serving() {
    // Given: A bound, serving bridge and a connected settings window
    let (_dir, shell) = temp_shell();
    let (shutdown_tx, state) =
        bridge_state(Arc::clone(&shell), Arc::new(RecordingClipboard::default()));
    let windows = state.windows();
    let server = BridgeServer::bind(0).await.unwrap();
    let url = server.url();
    let events_url = format!("ws://{}/api/events", server.addr());
    let serve = tokio::spawn(server.serve(state, shutdown_tx.subscribe()));

    let (mut socket, _) = connect_async(events_url.as_str()).await.unwrap();

    // Then: The current state arrives first
    assert_eq!(next_event(&mut socket).await, RecordingEvent { recording: false });
    assert_eq!(windows.count(), 1);

    // When: The flag is set and cleared
    shell.set_recording(true).await;
    shell.set_recording(false).await;

    // Then: Both changes arrive, in order
    assert_eq!(next_event(&mut socket).await, RecordingEvent { recording: true });
    assert_eq!(next_event(&mut socket).await, RecordingEvent { recording: false });

    // When: The window closes
    socket.close(None).await.unwrap();
    while let Ok(Some(Ok(message))) =
        tokio::time::timeout(Duration::from_secs(5), socket.next()).await
    {
        if matches!(message, WsMessage::Close(_)) {
            break;
        }
    }

    // Then: The bridge still answers and is still running
    let settings: Settings = reqwest::get(format!("{}api/config", url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(settings, Settings::default());
    assert!(!serve.is_finished());

    let _ = shutdown_tx.send(true);
    let result = tokio::time::timeout(Duration::from_secs(5), serve)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

/// WHAT: The connected-window count drops back to zero when the page goes
/// WHY: The tray only reopens the page when no window is showing it
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_connected_window_when_disconnecting_then_count_returns_to_zero() {
    // Given: A serving bridge with one connected window
    let (_dir, shell) = temp_shell();
    let (shutdown_tx, state) = bridge_state(shell, Arc::new(RecordingClipboard::default()));
    let windows = state.windows();
    let server = BridgeServer::bind(0).await.unwrap();
    let events_url = format!("ws://{}/api/events", server.addr());
    let serve = tokio::spawn(server.serve(state, shutdown_tx.subscribe()));

    let (mut socket, _) = connect_async(events_url.as_str()).await.unwrap();
    next_event(&mut socket).await;
    assert!(windows.any());

    // When: The socket is dropped without a close handshake
    drop(socket);

    // Then: The count returns to zero
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while windows.any() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(windows.count(), 0);

    let _ = shutdown_tx.send(true);
    let _ = tokio::time::timeout(Duration::from_secs(5), serve).await;
}
