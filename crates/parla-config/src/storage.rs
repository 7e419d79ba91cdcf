use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding preferences and history, platform data dir if unset
    pub data_dir: Option<String>,
}

impl StorageConfig {
    /// Resolve the data directory against a platform fallback
    pub fn resolve(&self, fallback: impl FnOnce() -> Option<PathBuf>) -> Option<PathBuf> {
        match &self.data_dir {
            Some(dir) if !dir.trim().is_empty() => Some(PathBuf::from(dir)),
            _ => fallback().map(|dir| dir.join("parla")),
        }
    }
}
