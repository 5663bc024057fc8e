//! HTTP server.
//!
//! Binds the camp API router to the configured address and serves it until
//! interrupted.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::{routes, AppState};
use crate::config::Config;
use crate::error::Result;
use crate::storage::Storage;

/// HTTP server for the camp API.
#[derive(Debug)]
pub struct HttpServer {
    addr: String,
    router: Router,
}

impl HttpServer {
    /// Create a server for `storage`, bound to the address in `config`.
    #[must_use]
    pub fn new(config: &Config, storage: Storage) -> Self {
        Self {
            addr: config.socket_addr(),
            router: Self::build_router(storage),
        }
    }

    /// Build the full router, including request tracing.
    #[must_use]
    pub fn build_router(storage: Storage) -> Router {
        let state = Arc::new(AppState::new(storage));
        routes(state).layer(TraceLayer::new_for_http())
    }

    /// Get the `host:port` address.
    #[must_use]
    pub fn socket_addr(&self) -> &str {
        &self.addr
    }

    /// Get the router (for testing).
    #[must_use]
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve requests until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or serving fails.
    pub async fn start(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr.as_str()).await?;
        info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
