use std::sync::Arc;

use folio_core::store::ContentStore;
use folio_publish::{PublishOrchestrator, VersionManager};
use tokio::sync::Mutex;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything lives behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Section and version storage (Postgres or in-memory).
    pub store: Arc<dyn ContentStore>,
    /// Server configuration (read by the auth extractors and login).
    pub config: Arc<ServerConfig>,
    /// Version snapshots over the same store.
    pub versions: Arc<VersionManager>,
    /// Publish pipeline; owns the per-page locks.
    pub publisher: Arc<PublishOrchestrator>,
    /// Serializes read-modify-write edits of the brand logo list.
    pub brands_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Wire the version manager and publisher to `store`.
    pub fn new(store: Arc<dyn ContentStore>, config: ServerConfig) -> Self {
        let versions = Arc::new(VersionManager::new(Arc::clone(&store)));
        let publisher = Arc::new(PublishOrchestrator::new(
            Arc::clone(&store),
            config.publish.clone(),
        ));
        Self {
            store,
            config: Arc::new(config),
            versions,
            publisher,
            brands_lock: Arc::new(Mutex::new(())),
        }
    }
}
