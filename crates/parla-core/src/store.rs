use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use parla_types::HistoryEntry;

pub const SOURCE_LANGUAGE_KEY: &str = "parla_source_code";
pub const TARGET_LANGUAGE_KEY: &str = "parla_target_code";
pub const THEME_KEY: &str = "parla_theme";
pub const CUSTOMIZATION_KEY: &str = "parla_customization";
pub const HISTORY_KEY: &str = "parla_history";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Durable string key-value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process store
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.values
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// One file per key under a base directory
#[derive(Clone)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create the base directory if needed
    pub fn open(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir).map_err(|source| StoreError::Io {
            key: base_dir.display().to_string(),
            source,
        })?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    fn io_error(key: &str, source: io::Error) -> StoreError {
        StoreError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.file_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::io_error(key, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.file_path(key);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value).map_err(|err| Self::io_error(key, err))?;
        fs::rename(&temp_path, &path).map_err(|err| Self::io_error(key, err))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::io_error(key, err)),
        }
    }
}

/// Persistence seam of the history cache
pub trait HistoryStore: Send + Sync {
    fn load(&self) -> Result<Vec<HistoryEntry>, StoreError>;

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), StoreError>;
}

/// History kept as a JSON array under one key
#[derive(Clone)]
pub struct KeyValueHistoryStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl KeyValueHistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: HISTORY_KEY.to_string(),
        }
    }
}

impl HistoryStore for KeyValueHistoryStore {
    fn load(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        match self.store.get(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(entries)?;
        self.store.set(&self.key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_roundtrips_and_reports_missing_keys() {
        let temp_dir = tempfile::TempDir::new().expect("temp dir");
        let store = FileStore::open(temp_dir.path().join("data")).expect("open");

        assert_eq!(store.get(THEME_KEY).unwrap(), None);
        store.set(THEME_KEY, "light").unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));

        store.remove(THEME_KEY).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
        store.remove(THEME_KEY).expect("removing twice is fine");
    }

    #[test]
    fn file_store_leaves_no_temp_files() {
        let temp_dir = tempfile::TempDir::new().expect("temp dir");
        let store = FileStore::open(temp_dir.path().to_path_buf()).expect("open");
        store.set(HISTORY_KEY, "[]").unwrap();

        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec![format!("{HISTORY_KEY}.json")]);
    }

    #[test]
    fn history_store_treats_missing_key_as_empty() {
        let store = KeyValueHistoryStore::new(Arc::new(MemoryStore::new()));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn history_store_surfaces_corrupt_json() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(HISTORY_KEY, "{not json").unwrap();
        let store = KeyValueHistoryStore::new(kv);
        assert!(matches!(store.load(), Err(StoreError::Serde(_))));
    }
}
