use std::sync::Arc;

use crate::config::ServerConfig;
use crate::store::DataStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Frame folders, label sheets, and annotation files on disk.
    pub store: Arc<DataStore>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let store = DataStore::new(
            config.frames_dir(),
            config.label_dir.clone(),
            config.annotations_dir.clone(),
        );
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}
