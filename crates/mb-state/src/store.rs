//! Key/value storage
//!
//! String keys to string values, the same shape as browser local storage.
//! [`JsonFileStore`] persists to a single pretty-printed JSON file and
//! rewrites it on every mutation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

/// Last-seen calendar day, ISO `YYYY-MM-DD`
pub const KEY_USAGE_DATE: &str = "ritual_usage_date";
/// Attempts recorded on that day, string-encoded integer
pub const KEY_USAGE_COUNT: &str = "ritual_usage_count";
/// Admin override flag, `"true"` / `"false"`
pub const KEY_ADMIN_MODE: &str = "ritual_admin_mode";
/// Selected language code
pub const KEY_LANGUAGE: &str = "ritual_lang";

/// Opaque persisted storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StateError>;

    fn remove(&self, key: &str) -> Result<(), StateError>;
}

/// Store handle shared by every state owner
pub type SharedStore = Arc<dyn KeyValueStore>;

/// In-memory store (tests, ephemeral sessions)
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to a fresh empty store
    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StateError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StateError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// JSON-file backed store
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at the standard location
    pub fn open_default() -> Self {
        Self::open(Self::default_path())
    }

    /// Open a store file. A missing or unreadable file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("[Store] Ignoring unreadable store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Shared handle
    pub fn shared<P: AsRef<Path>>(path: P) -> SharedStore {
        Arc::new(Self::open(path))
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Default store file path
    pub fn default_path() -> PathBuf {
        let base = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .map(|h| h.join("Library/Application Support/Mood Blossom"))
                .unwrap_or_else(|| PathBuf::from("."))
        } else if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .map(|d| d.join("Mood Blossom"))
                .unwrap_or_else(|| PathBuf::from("."))
        } else {
            dirs::config_dir()
                .map(|d| d.join("mood-blossom"))
                .unwrap_or_else(|| PathBuf::from("."))
        };
        base.join("ritual_store.json")
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StateError> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StateError> {
        let mut entries = self.entries.lock();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// Persistence errors
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
