use std::sync::Arc;

use sketchbin_docdb::DocDb;
use sketchbin_store::DocumentStore;

use crate::config::ServerConfig;

/// Shared handles passed to every request handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub docdb: Arc<DocDb>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: ServerConfig) -> Self {
        Self {
            store,
            docdb: Arc::new(DocDb::new()),
            config: Arc::new(config),
        }
    }
}
