//! Server Implementation
//!
//! HTTP 服务器启动和管理

use crate::api;
use crate::core::{Config, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with an initialized state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = self.state.clone();

        if self.config.is_production() && self.config.webhook_api_key == "dev-webhook-key-change-this"
        {
            tracing::warn!("WEBHOOK_API_KEY is still the development default");
        }

        // Start background tasks
        let tasks = state.start_background_tasks().await;

        let app = api::build_app(state.clone());

        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("  Environment  : {}", self.config.environment);
        tracing::info!("  Database     : {}", self.config.database_path);
        tracing::info!("  Timezone     : {}", self.config.timezone);
        tracing::info!("  HTTP Server  : http://{}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tasks.shutdown().await;

        Ok(())
    }
}
