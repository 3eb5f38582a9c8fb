//! Shared application state for the azvm server.
//!
//! Owns the one `MetadataService` (and therefore the one cache) used by both
//! the request handler and startup enrichment.

use std::sync::Arc;

use azvm_core::error::Result;

use crate::config::ServerConfig;
use crate::metadata::{ImdsClient, MetadataService, MetadataSource};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metadata: Arc<MetadataService>,
}

struct AppStateInner {
    cfg: ServerConfig,
}

impl AppState {
    /// Build state backed by the real metadata provider.
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        let source = ImdsClient::new(&cfg.metadata)?;
        tracing::debug!(url = %source.url(), "metadata provider configured");
        Ok(Self::with_source(cfg, Arc::new(source)))
    }

    /// Build state around any metadata source.
    pub fn with_source(cfg: ServerConfig, source: Arc<dyn MetadataSource>) -> Self {
        let metadata = MetadataService::new(
            source,
            cfg.metadata.ttl(),
            cfg.metadata.stale_on_error,
        );

        Self {
            inner: Arc::new(AppStateInner { cfg }),
            metadata: Arc::new(metadata),
        }
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn metadata(&self) -> Arc<MetadataService> {
        Arc::clone(&self.metadata)
    }
}
