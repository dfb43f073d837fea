//! Who may talk to the bridge.
//!
//! The bridge only answers requests addressed to its own loopback authority.
//! A foreign `Host` means the name was rebound to 127.0.0.1 by some other
//! page. A foreign `Origin` means another page is making the request. CORS
//! headers alone do not stop either: they only hide responses, and simple
//! requests still execute.

use crate::BridgeState;

use std::net::Ipv4Addr;

use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{HOST, ORIGIN},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

/// `Host` values the bridge answers to when bound to `port`.
pub(crate) fn allowed_hosts(port: u16) -> Vec<HeaderValue> {
    [
        format!("{}:{}", Ipv4Addr::LOCALHOST, port),
        format!("localhost:{}", port),
    ]
    .into_iter()
    .filter_map(|host| HeaderValue::from_str(&host).ok())
    .collect()
}

/// Origins the settings page can be loaded from when bound to `port`.
pub(crate) fn allowed_origins(port: u16) -> Vec<HeaderValue> {
    allowed_hosts(port)
        .iter()
        .filter_map(|host| host.to_str().ok())
        .filter_map(|host| HeaderValue::from_str(&format!("http://{}", host)).ok())
        .collect()
}

/// A request without a `Host` cannot be attributed and is refused.
pub(crate) fn host_allowed(headers: &HeaderMap, hosts: &[HeaderValue]) -> bool {
    headers
        .get(HOST)
        .is_some_and(|host| hosts.iter().any(|allowed| allowed == host))
}

/// Requests without an `Origin` come from the page itself (same-origin
/// `GET`) or from non-browser clients.
pub(crate) fn origin_allowed(headers: &HeaderMap, origins: &[HeaderValue]) -> bool {
    headers
        .get(ORIGIN)
        .is_none_or(|origin| origins.iter().any(|allowed| allowed == origin))
}

/// Middleware rejecting every request not addressed to, and sent from, the
/// bridge itself. Applies to WebSocket upgrades too, which browsers never
/// subject to CORS.
pub(crate) async fn guard(
    State(state): State<BridgeState>,
    request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();

    if !host_allowed(headers, &state.hosts) {
        warn!(host = ?headers.get(HOST), uri = %request.uri(), "Rejected request for foreign host");
        return StatusCode::FORBIDDEN.into_response();
    }

    if !origin_allowed(headers, &state.origins) {
        warn!(origin = ?headers.get(ORIGIN), uri = %request.uri(), "Rejected request from foreign origin");
        return StatusCode::FORBIDDEN.into_response();
    }

    next.run(request).await
}
