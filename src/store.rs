//! Key-value persistence for user-entered rows.
//!
//! Values are stored wholesale as JSON under a fixed key and overwritten on
//! every save.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::{StorageBackend, StorageConfig};
use crate::core::capital_loss::LossRecord;
use crate::core::portfolio::Position;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("stored value for key {key} is not valid JSON: {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
    #[error("store lock poisoned")]
    Poisoned,
}

/// A named slot whose contents deserialize to `T`.
pub struct StoreKey<T> {
    name: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T> StoreKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _value: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: DeserializeOwned> StoreKey<T> {
    /// Fails when `raw` would not load back as `T`.
    pub fn check(&self, raw: &str) -> Result<(), StoreError> {
        serde_json::from_str::<T>(raw)
            .map(drop)
            .map_err(|source| StoreError::Json {
                key: self.name.to_string(),
                source,
            })
    }
}

pub const POSITIONS_KEY: StoreKey<Vec<Position>> = StoreKey::new("positions");
pub const CAPITAL_LOSSES_KEY: StoreKey<Vec<LossRecord>> = StoreKey::new("capital-losses");

/// Validates a raw value written to `key` against its typed slot, if any.
pub fn check_slot_value(key: &str, raw: &str) -> Result<(), StoreError> {
    if key == POSITIONS_KEY.name() {
        POSITIONS_KEY.check(raw)
    } else if key == CAPITAL_LOSSES_KEY.name() {
        CAPITAL_LOSSES_KEY.check(raw)
    } else {
        Ok(())
    }
}

/// Untyped backend. Implementations hold raw JSON text per key.
pub trait KeyValueStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<bool, StoreError>;
}

/// Typed access on top of any [`KeyValueStore`].
pub trait TypedStore {
    fn get<T: DeserializeOwned>(&self, key: &StoreKey<T>) -> Result<Option<T>, StoreError>;
    fn set<T: Serialize>(&self, key: &StoreKey<T>, value: &T) -> Result<(), StoreError>;
    fn remove<T>(&self, key: &StoreKey<T>) -> Result<bool, StoreError>;
}

impl<S: KeyValueStore + ?Sized> TypedStore for S {
    fn get<T: DeserializeOwned>(&self, key: &StoreKey<T>) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.get_raw(key.name())? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Json {
                key: key.name().to_string(),
                source,
            })
    }

    fn set<T: Serialize>(&self, key: &StoreKey<T>, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Json {
            key: key.name().to_string(),
            source,
        })?;
        self.set_raw(key.name(), raw)
    }

    fn remove<T>(&self, key: &StoreKey<T>) -> Result<bool, StoreError> {
        self.delete(key.name())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.remove(key).is_some())
    }
}

/// One `<key>.json` file per key inside `root`.
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
    write_lock: RwLock<()>,
}

impl JsonFileStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self {
            root,
            write_lock: RwLock::new(()),
        })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.read().map_err(|_| StoreError::Poisoned)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let _guard = self.write_lock.write().map_err(|_| StoreError::Poisoned)?;
        let io_err = |source: io::Error| StoreError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.write().map_err(|_| StoreError::Poisoned)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Builds the backend selected in the configuration.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    Ok(match config.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => Arc::new(JsonFileStore::open(&config.directory)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::portfolio::AssetCategory;
    use tempfile::TempDir;

    fn positions() -> Vec<Position> {
        vec![Position {
            id: "p1".to_string(),
            ticker: "ENI".to_string(),
            name: "Eni".to_string(),
            category: AssetCategory::Equity,
            quantity: 100.0,
            avg_price: 13.5,
            current_price: 14.2,
        }]
    }

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get(&POSITIONS_KEY).expect("get"), None);
        store.set(&POSITIONS_KEY, &positions()).expect("set");
        assert_eq!(store.get(&POSITIONS_KEY).expect("get"), Some(positions()));

        store.set(&POSITIONS_KEY, &Vec::new()).expect("overwrite");
        assert_eq!(store.get(&POSITIONS_KEY).expect("get"), Some(Vec::new()));

        assert!(store.remove(&POSITIONS_KEY).expect("delete"));
        assert!(!store.remove(&POSITIONS_KEY).expect("delete again"));
        assert_eq!(store.get(&POSITIONS_KEY).expect("get"), None);
    }

    #[test]
    fn memory_store_round_trip() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn file_store_round_trip_and_persistence() {
        let dir = TempDir::new().expect("tempdir");
        exercise(&JsonFileStore::open(dir.path()).expect("open"));

        let store = JsonFileStore::open(dir.path()).expect("open");
        store.set(&POSITIONS_KEY, &positions()).expect("set");
        drop(store);
        let reopened = JsonFileStore::open(dir.path()).expect("reopen");
        assert_eq!(reopened.get(&POSITIONS_KEY).expect("get"), Some(positions()));
        assert!(dir.path().join("positions.json").exists());
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = TempDir::new().expect("tempdir");
        let store = JsonFileStore::open(dir.path()).expect("open");
        assert!(matches!(
            store.get_raw("../escape"),
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn open_store_honours_configured_backend() {
        let dir = TempDir::new().expect("tempdir");
        let config = StorageConfig {
            backend: StorageBackend::File,
            directory: dir.path().join("nested"),
        };
        let store = open_store(&config).expect("open");
        store.set(&CAPITAL_LOSSES_KEY, &Vec::new()).expect("set");
        assert!(dir.path().join("nested").join("capital-losses.json").exists());

        let memory = open_store(&StorageConfig {
            backend: StorageBackend::Memory,
            ..config
        })
        .expect("open memory");
        assert_eq!(memory.get(&POSITIONS_KEY).expect("get"), None);
    }

    #[test]
    fn typed_slots_reject_foreign_shapes() {
        assert!(matches!(
            check_slot_value("positions", r#"{"hello":1}"#),
            Err(StoreError::Json { .. })
        ));
        assert!(check_slot_value("capital-losses", r#"[{"id":"x"}]"#).is_err());
        assert!(check_slot_value("positions", "[]").is_ok());
        assert!(check_slot_value("notes", r#"{"hello":1}"#).is_ok());
    }

    #[test]
    fn corrupt_json_surfaces_as_error() {
        let store = MemoryStore::new();
        store
            .set_raw(CAPITAL_LOSSES_KEY.name(), "{not json".to_string())
            .expect("raw set");
        assert!(matches!(
            store.get(&CAPITAL_LOSSES_KEY),
            Err(StoreError::Json { .. })
        ));
    }
}
