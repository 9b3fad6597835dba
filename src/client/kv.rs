use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("key-value store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("key-value store is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Small persistent string-keyed store holding JSON values
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Value>, KvError>;

    fn write(&self, key: &str, value: Value) -> Result<(), KvError>;

    fn remove(&self, key: &str) -> Result<(), KvError>;
}

/// All keys live in one JSON object file, rewritten on every change
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<Map<String, Value>, KvError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Load before a change. Corrupt JSON is replaced; I/O failures are not.
    fn load_for_update(&self) -> Result<Map<String, Value>, KvError> {
        match self.load() {
            Err(KvError::Serialization(e)) => {
                warn!(path = %self.path.display(), "discarding corrupt key-value file: {}", e);
                Ok(Map::new())
            }
            other => other,
        }
    }

    /// Write to a sibling temp file, then rename it over the target
    fn save(&self, entries: &Map<String, Value>) -> Result<(), KvError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let content = serde_json::to_string_pretty(entries)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| KvError::Io(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<Value>, KvError> {
        Ok(self.load()?.remove(key))
    }

    fn write(&self, key: &str, value: Value) -> Result<(), KvError> {
        let mut entries = self.load_for_update()?;
        entries.insert(key.to_string(), value);
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        let mut entries = self.load_for_update()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn read(&self, key: &str) -> Result<Option<Value>, KvError> {
        Ok(self.entries().get(key).cloned())
    }

    fn write(&self, key: &str, value: Value) -> Result<(), KvError> {
        self.entries().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Integer counter that survives restarts through a [`KeyValueStore`]
pub struct PersistentCounter<S> {
    store: S,
    key: String,
    default: i64,
}

impl<S: KeyValueStore> PersistentCounter<S> {
    pub fn new(store: S, key: impl Into<String>, default: i64) -> Self {
        Self {
            store,
            key: key.into(),
            default,
        }
    }

    /// Current value. Missing, unreadable or non-integer entries read as the default.
    pub fn get(&self) -> i64 {
        match self.store.read(&self.key) {
            Ok(Some(value)) => value.as_i64().unwrap_or_else(|| {
                warn!(key = %self.key, "counter value {} is not an integer, using default", value);
                self.default
            }),
            Ok(None) => self.default,
            Err(e) => {
                warn!(key = %self.key, "counter unreadable, using default: {}", e);
                self.default
            }
        }
    }

    pub fn increment(&self) -> Result<i64, KvError> {
        let next = self.get().saturating_add(1);
        self.store.write(&self.key, Value::from(next))?;
        Ok(next)
    }

    pub fn reset(&self) -> Result<i64, KvError> {
        self.store.remove(&self.key)?;
        Ok(self.default)
    }
}
