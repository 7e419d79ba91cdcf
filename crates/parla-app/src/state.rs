use std::path::PathBuf;
use std::sync::Arc;

use parla_config::Config;
use parla_core::store::KeyValueStore;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    /// Durable preferences and history
    pub store: Arc<dyn KeyValueStore>,
    /// Where generated speech is written; None when only memory storage is available
    pub data_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>, data_dir: Option<PathBuf>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            data_dir,
        }
    }
}
