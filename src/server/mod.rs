pub mod api;

use crate::agent::ChatAgent;
use crate::config::settings::{ ServiceConfig, TlsPaths };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use log::{ info, warn };

pub struct Server {
    agent: Arc<ChatAgent>,
    config: ServiceConfig,
}

impl Server {
    pub fn new(agent: Arc<ChatAgent>, config: ServiceConfig) -> Self {
        if config.rate_limit_per_second == 0 {
            info!("Request rate limiting disabled.");
        } else {
            info!("Global rate limit: {} requests/second", config.rate_limit_per_second);
        }

        Self { agent, config }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.config.server_addr.parse::<SocketAddr>()
            .map_err(|e| format!("Invalid server address '{}': {}", self.config.server_addr, e))?;

        let state = api::AppState::new(self.agent.clone(), self.config.rate_limit_per_second);
        let app = api::router(state, api::cors_layer(self.config.cors_origins.clone()));

        match &self.config.tls {
            Some(TlsPaths { cert_path, key_path }) => {
                info!(
                    "TLS enabled. Loading certificate from '{}' and key from '{}'",
                    cert_path,
                    key_path
                );
                let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                    cert_path,
                    key_path
                ).await?;

                let handle = axum_server::Handle::new();
                let shutdown_handle = handle.clone();
                tokio::spawn(async move {
                    shutdown_signal().await;
                    shutdown_handle.graceful_shutdown(None);
                });

                info!("HTTPS server listening on: https://{}", addr);
                axum_server::bind_rustls(addr, tls_config)
                    .handle(handle)
                    .serve(app.into_make_service()).await?;
            }
            None => {
                let listener = tokio::net::TcpListener::bind(addr).await
                    .map_err(|e| format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e))?;
                info!("HTTP server listening on: http://{}", addr);
                axum::serve(listener, app.into_make_service())
                    .with_graceful_shutdown(shutdown_signal()).await?;
            }
        }

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
