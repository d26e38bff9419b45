//! Key-value preference store.
//!
//! Preferences (currently the rest-time overrides) live in a flat key-value
//! store injected by the caller. `JsonFileStore` keeps them in a single JSON
//! object file with file locking; `MemoryStore` is for tests and ephemeral use.

use crate::{Error, RestTimeOverrides, Result};
use fs2::FileExt;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Key under which rest-time overrides are stored
pub const REST_TIME_OVERRIDES_KEY: &str = "restTimeOverrides";

/// Flat string key-value store (last write wins)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Read-modify-write one key
    ///
    /// Nothing is written when `f` fails. Shared stores override this to
    /// hold their write lock across the read and the write.
    fn update(
        &mut self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<String>,
    ) -> Result<()> {
        let next = f(self.get(key)?)?;
        self.set(key, &next)
    }
}

/// In-memory store
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by one JSON object file
///
/// Values that are themselves JSON are nested as-is, so the file stays
/// readable: `{"restTimeOverrides": {"chest_press": 60}}`. Anything else is
/// stored as a JSON string. Writers serialize on an exclusive lock of a
/// `<file>.lock` sidecar, so concurrent updates of different keys all land.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("preferences"));
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Run a read-modify-write while holding the writer lock
    fn with_write_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let result = f();
        lock.unlock()?;
        result
    }

    /// Read the whole file with a shared lock
    ///
    /// Missing or corrupted files read as empty.
    fn load(&self) -> Result<BTreeMap<String, Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;

        if let Err(e) = read {
            tracing::warn!(
                "Failed to read preferences {:?}: {}. Using defaults.",
                self.path,
                e
            );
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str::<BTreeMap<String, Value>>(&contents) {
            Ok(values) => Ok(values),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse preferences {:?}: {}. Using defaults.",
                    self.path,
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    /// Atomically replace the file (temp file, sync, rename)
    fn save(&self, values: &BTreeMap<String, Value>) -> Result<()> {
        let parent = self.path.parent().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "preferences path missing parent",
            ))
        })?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(values)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved preferences to {:?}", self.path);
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key).map(from_stored_value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.with_write_lock(|| {
            let mut values = self.load()?;
            values.insert(key.to_string(), to_stored_value(value));
            self.save(&values)
        })
    }

    fn update(
        &mut self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<String>,
    ) -> Result<()> {
        self.with_write_lock(|| {
            let mut values = self.load()?;
            let current = values.get(key).cloned().map(from_stored_value);
            let next = f(current)?;
            values.insert(key.to_string(), to_stored_value(&next));
            self.save(&values)
        })
    }
}

fn to_stored_value(value: &str) -> Value {
    match serde_json::from_str::<Value>(value) {
        Ok(json @ (Value::Object(_) | Value::Array(_))) => json,
        _ => Value::String(value.to_string()),
    }
}

fn from_stored_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl RestTimeOverrides {
    /// Load overrides from a store; an unreadable value yields no overrides
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        Ok(Self::parse(store.get(REST_TIME_OVERRIDES_KEY)?))
    }

    fn parse(raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        match serde_json::from_str::<RestTimeOverrides>(&raw) {
            Ok(overrides) => {
                tracing::debug!("Loaded {} rest-time overrides", overrides.len());
                overrides
            }
            Err(e) => {
                tracing::warn!("Failed to parse rest-time overrides: {}. Ignoring.", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<()> {
        let raw = serde_json::to_string(self)?;
        store.set(REST_TIME_OVERRIDES_KEY, &raw)?;
        tracing::info!("Saved {} rest-time overrides", self.len());
        Ok(())
    }

    /// Load, modify and save back as one store update
    pub fn update<F>(store: &mut dyn KeyValueStore, mut f: F) -> Result<Self>
    where
        F: FnMut(&mut RestTimeOverrides) -> Result<()>,
    {
        let mut updated = Self::default();
        store.update(REST_TIME_OVERRIDES_KEY, &mut |raw| {
            let mut overrides = Self::parse(raw);
            f(&mut overrides)?;
            let raw = serde_json::to_string(&overrides)?;
            updated = overrides;
            Ok(raw)
        })?;
        tracing::info!("Saved {} rest-time overrides", updated.len());
        Ok(updated)
    }
}
