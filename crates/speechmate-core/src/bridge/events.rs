//! `recording-status` push channel.
//!
//! One broadcast subscription per connected settings window. The socket
//! closing is the window closing; the shell keeps running in the tray.

use crate::{BridgeState, RecordingEvent};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

/// Origin and host were already checked by the access guard.
pub(crate) async fn events(State(state): State<BridgeState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| stream_events(socket, state))
}

async fn stream_events(mut socket: WebSocket, state: BridgeState) {
    let mut events = state.shell.subscribe();
    let mut shutdown_rx = state.shutdown_rx.clone();
    let _window = state.windows.connect();

    info!(windows = state.windows.count(), "Settings window connected");

    let snapshot = RecordingEvent {
        recording: state.shell.is_recording().await,
    };
    if send_event(&mut socket, snapshot).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                let _ = socket.send(Message::Close(None)).await;
                debug!("Event stream closed for shutdown");
                break;
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None => {
                    info!("Settings window closed, shell keeps running in tray");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(error = %e, "Event stream receive error");
                    break;
                }
            },
            event = events.recv() => match event {
                Ok(event) => {
                    if send_event(&mut socket, event).await.is_err() {
                        info!("Settings window gone, shell keeps running in tray");
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
}

async fn send_event(socket: &mut WebSocket, event: RecordingEvent) -> Result<(), axum::Error> {
    let payload = match serde_json::to_string(&event) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Failed to encode recording event");
            return Ok(());
        }
    };

    socket.send(Message::Text(payload.into())).await
}
