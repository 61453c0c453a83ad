use std::sync::Arc;

use folio_core::ProjectStore;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// Folio HTTP server.
pub struct FolioServer {
    config: ServerConfig,
    store: ProjectStore,
}

impl FolioServer {
    /// Open the store named by `config` (in memory without a `data_dir`).
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = match &config.data_dir {
            Some(dir) => ProjectStore::open(dir, config.store_config())?,
            None => ProjectStore::in_memory().with_config(config.store_config()),
        };
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: ServerConfig, store: ProjectStore) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState {
            store: self.store.clone(),
            base_domain: Arc::from(self.config.base_domain.as_str()),
            default_page: Arc::from(self.config.default_page.as_str()),
        })
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            base_domain = %self.config.base_domain,
            "Folio server listening"
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
