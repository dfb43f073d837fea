//! The bridge between the settings UI and the shell.
//!
//! A fixed router on loopback. The UI can only reach the shell through these
//! routes; it never holds a file, hotkey, clipboard or lifecycle handle.
//! Requests for any other host, or from any other origin, are refused.

mod access;
mod bridge_error;
mod bridge_server;
mod bridge_state;
mod connected_windows;
mod events;
mod handlers;
mod routes;
mod ui;

pub use {
    bridge_error::BridgeError,
    bridge_server::BridgeServer,
    bridge_state::BridgeState,
    connected_windows::{ConnectedWindows, WindowGuard},
    handlers::{ClipboardRequest, HealthCheckRequest, HealthCheckResponse, SetRecordingRequest},
    routes::router,
};

#[cfg(test)]
pub(crate) use access::{host_allowed, origin_allowed};
