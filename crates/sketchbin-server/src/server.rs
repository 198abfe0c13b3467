use std::sync::Arc;

use axum::Router;
use sketchbin_store::{open_store, DocumentStore};
use tokio::net::TcpListener;
use tokio::signal;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::router::build_router;
use crate::state::AppState;

/// Sketchbin HTTP server.
pub struct SketchbinServer {
    state: AppState,
}

impl SketchbinServer {
    /// Open the configured store and prepare shared state.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = open_store(&config.storage)?;
        Ok(Self::with_store(config, store))
    }

    /// Use an already opened store instead of the configured one.
    pub fn with_store(config: ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            state: AppState::new(store, config),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Serve requests until Ctrl+C or SIGTERM.
    pub async fn serve(self) -> ServerResult<()> {
        let addr = self.state.config.bind_addr;
        let app = self.router();
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Sketchbin server listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Sketchbin server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
