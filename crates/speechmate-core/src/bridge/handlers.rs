use crate::{BridgeError, BridgeState, PartialSettings, Settings};

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

/// Body of `set-recording`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetRecordingRequest {
    /// New value of the recording flag.
    pub recording: bool,
}

/// Body of `write-clipboard`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClipboardRequest {
    /// Text to place on the clipboard.
    pub text: String,
}

/// Body of `test-connection`: the address currently typed into the form,
/// which may not be saved yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthCheckRequest {
    /// Base address of the host to check.
    pub base_url: String,
}

/// Result of `test-connection`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Whether the host answered its health endpoint with success.
    pub ok: bool,
}

/// get-config
pub(crate) async fn get_config(State(state): State<BridgeState>) -> Json<Settings> {
    Json(state.shell.settings().await)
}

/// save-config
#[instrument(skip_all)]
pub(crate) async fn save_config(
    State(state): State<BridgeState>,
    Json(partial): Json<PartialSettings>,
) -> Result<Json<bool>, BridgeError> {
    match state.shell.save_settings(partial).await {
        Ok(_) => Ok(Json(true)),
        Err(e) => {
            error!(error = %e, "save-config failed");
            Err(e.into())
        }
    }
}

/// set-recording
pub(crate) async fn set_recording(
    State(state): State<BridgeState>,
    Json(request): Json<SetRecordingRequest>,
) -> StatusCode {
    state.shell.set_recording(request.recording).await;
    StatusCode::NO_CONTENT
}

/// write-clipboard
#[instrument(skip_all)]
pub(crate) async fn write_clipboard(
    State(state): State<BridgeState>,
    Json(request): Json<ClipboardRequest>,
) -> Result<StatusCode, BridgeError> {
    match state.clipboard.write_text(&request.text) {
        Ok(()) => {
            info!(text_len = request.text.len(), "Written to clipboard");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            error!(error = %e, "write-clipboard failed");
            Err(e.into())
        }
    }
}

/// test-connection, against the address in the request.
pub(crate) async fn health_check(
    State(state): State<BridgeState>,
    Json(request): Json<HealthCheckRequest>,
) -> Json<HealthCheckResponse> {
    let ok = state.health.check(&request.base_url).await;

    Json(HealthCheckResponse { ok })
}
