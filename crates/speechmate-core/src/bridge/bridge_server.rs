use crate::{BridgeState, CoreError, CoreResult, router};

use std::{
    net::{Ipv4Addr, SocketAddr},
    panic::Location,
};

use error_location::ErrorLocation;
use tokio::{net::TcpListener, sync::watch};
use tracing::{info, instrument};

/// Bridge HTTP server bound to loopback.
///
/// Binding happens before the settings window is ever shown, so the page
/// never loads against a server that is not listening yet.
pub struct BridgeServer {
    listener: TcpListener,
    addr: SocketAddr,
}

impl BridgeServer {
    /// Bind to `127.0.0.1:port`. Port 0 picks a free port.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BridgeServer`] if the port cannot be bound.
    #[instrument]
    pub async fn bind(port: u16) -> CoreResult<Self> {
        let caller = Location::caller();

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, port))
            .await
            .map_err(|source| CoreError::BridgeServer {
                source,
                location: ErrorLocation::from(caller),
            })?;

        let addr = listener
            .local_addr()
            .map_err(|source| CoreError::BridgeServer {
                source,
                location: ErrorLocation::from(caller),
            })?;

        info!(addr = %addr, "Bridge server bound");

        Ok(Self { listener, addr })
    }

    /// Bound socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// URL of the settings page.
    pub fn url(&self) -> String {
        format!("http://{}:{}/", Ipv4Addr::LOCALHOST, self.addr.port())
    }

    /// Serve until `shutdown_rx` flips to `true` or its sender is dropped.
    ///
    /// Only requests addressed to this address, from pages it served, are
    /// answered.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BridgeServer`] if serving fails.
    pub async fn serve(
        self,
        state: BridgeState,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> CoreResult<()> {
        let caller = Location::caller();
        let app = router(state.bound_to(self.addr.port()));

        info!(url = %self.url(), "Bridge server listening");

        axum::serve(self.listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.wait_for(|stop| *stop).await;
            })
            .await
            .map_err(|source| CoreError::BridgeServer {
                source,
                location: ErrorLocation::from(caller),
            })?;

        info!("Bridge server stopped");

        Ok(())
    }
}
