//! Application state shared across handlers

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{ConnectionCache, Connector, MemoryConnector, PgConnector};
use crate::media::{HttpUploader, MediaUploader};

/// Shared application state
pub struct AppState {
    pub db: ConnectionCache,
    pub uploader: Arc<dyn MediaUploader>,
}

impl AppState {
    pub fn new(connector: Arc<dyn Connector>, uploader: Arc<dyn MediaUploader>) -> Self {
        Self {
            db: ConnectionCache::new(connector),
            uploader,
        }
    }

    /// PostgreSQL store and HTTP media uploader from `config`.
    pub fn from_config(config: AppConfig) -> Self {
        let connector = PgConnector::new(config.database_url, config.pool);
        Self::new(Arc::new(connector), Arc::new(HttpUploader::new(config.media)))
    }

    /// Memory store, with uploads still going to the configured media host.
    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(
            Arc::new(MemoryConnector::default()),
            Arc::new(HttpUploader::new(config.media)),
        )
    }
}
