use std::sync::Arc;

use popt_sdk::Optimizer;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// Prompt optimizer HTTP server.
pub struct PoptServer {
    config: ServerConfig,
    state: AppState,
}

impl PoptServer {
    pub fn new(config: ServerConfig, optimizer: Optimizer) -> Self {
        Self {
            config,
            state: Arc::new(optimizer),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        let router = build_router(Arc::clone(&self.state));
        if self.config.allow_any_origin {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Start serving requests until the task is cancelled or ctrl-c.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        info!(addr = %self.config.bind_addr, "popt server listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
