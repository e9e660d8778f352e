//! Key-value persistence service.
//!
//! Holds the small amount of state that outlives a run: the saved SSH
//! profiles and the selected theme. Values are JSON; [`Store::set`] only
//! stages a value and [`Store::flush`] makes it durable.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Keyed storage contract consumed by the configuration manager.
pub trait Store {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
    fn remove(&mut self, key: &str);
    fn flush(&mut self) -> Result<()>;
}

/// Read and deserialize a value, treating malformed entries as absent.
pub fn get_typed<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Option<T> {
    let value = store.get(key)?;
    match serde_json::from_value(value) {
        Ok(typed) => Some(typed),
        Err(e) => {
            tracing::warn!("Ignoring malformed store entry '{}': {}", key, e);
            None
        }
    }
}

/// Store backed by a single JSON object on disk.
///
/// Flushing writes a sibling temp file and renames it over the target so a
/// crash mid-write never leaves a truncated store behind.
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Store {:?} is corrupt, starting empty: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to read store {:?}: {}", path, e);
                }
                BTreeMap::new()
            }
        };
        tracing::debug!("Opened store {:?} with {} key(s)", path, entries.len());
        Self { path, entries }
    }

    /// Open the store at its default location.
    pub fn open_default() -> Self {
        Self::open(terminon_paths::store_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory: {:?}", parent))?;
        }
        let content =
            serde_json::to_string_pretty(&self.entries).context("Failed to serialize store")?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write store: {:?}", tmp))?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            if let Err(cleanup) = std::fs::remove_file(&tmp) {
                tracing::debug!("Failed to remove {:?}: {}", tmp, cleanup);
            }
            return Err(e).with_context(|| format!("Failed to replace store: {:?}", self.path));
        }
        tracing::debug!("Flushed store {:?}", self.path);
        Ok(())
    }
}

/// In-memory store with no durability, for ephemeral runs and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
    flushes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful flushes so far.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn json_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = JsonFileStore::open(&path);
        store.set("theme", json!("dracula"));
        store.flush().unwrap();

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("theme"), Some(json!("dracula")));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn unflushed_values_are_not_durable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let mut store = JsonFileStore::open(&path);
        store.set("theme", json!("campbell"));

        assert!(JsonFileStore::open(&path).get("theme").is_none());
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert!(store.get("theme").is_none());
    }

    #[test]
    fn flush_into_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();

        let mut store = JsonFileStore::open(blocker.join("store.json"));
        store.set("theme", json!("dracula"));
        assert!(store.flush().is_err());
    }

    #[test]
    fn failed_replace_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        // A non-empty directory where the store file should be
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let mut store = JsonFileStore::open(&path);
        store.set("theme", json!("dracula"));
        assert!(store.flush().is_err());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn remove_drops_key() {
        let mut store = MemoryStore::new();
        store.set("k", json!(1));
        store.remove("k");
        assert!(store.get("k").is_none());
    }

    #[test]
    fn get_typed_ignores_malformed_values() {
        let mut store = MemoryStore::new();
        store.set("theme", json!(42));
        assert_eq!(get_typed::<String>(&store, "theme"), None);

        store.set("theme", json!("dracula"));
        assert_eq!(
            get_typed::<String>(&store, "theme").as_deref(),
            Some("dracula")
        );
    }
}
