use crate::CoreError;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Failure of a bridge operation, reported to the UI as a JSON error body.
#[derive(Debug)]
pub struct BridgeError(pub CoreError);

impl From<CoreError> for BridgeError {
    fn from(source: CoreError) -> Self {
        Self(source)
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
