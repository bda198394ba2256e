//! Key-value record stores
//!
//! Both the player store and the leaderboard are a single logical map that
//! is loaded whole and written back whole:
//!
//! ```text
//! RecordStore<V>
//!     ├── RwLock<BTreeMap<String, V>>   (in-memory cache)
//!     └── Box<dyn Persistence<V>>
//!           ├── JsonFileBackend      (pretty JSON, temp file + rename)
//!           └── MemoryBackend        (tests, embedding)
//! ```
//!
//! Every mutation runs its read-modify-write and the flush under the
//! write lock, so concurrent callers on one store never lose updates.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{StoreError, StoreResult};
use crate::player::PlayerRecord;

/// Load-all / save-all persistence for a string-keyed map
pub trait Persistence<V>: Send + Sync {
    /// Load every entry. A store that does not exist yet is empty.
    fn load_all(&self) -> StoreResult<BTreeMap<String, V>>;

    /// Replace the stored contents with `entries`
    fn save_all(&self, entries: &BTreeMap<String, V>) -> StoreResult<()>;

    /// Human-readable location for logs
    fn location(&self) -> String;
}

// ============================================================================
// JSON file backend
// ============================================================================

/// Stores the map as one pretty-printed JSON object
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl<V> Persistence<V> for JsonFileBackend
where
    V: Serialize + DeserializeOwned,
{
    fn load_all(&self) -> StoreResult<BTreeMap<String, V>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Serialize {
            path: self.path.clone(),
            source,
        })
    }

    fn save_all(&self, entries: &BTreeMap<String, V>) -> StoreResult<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Serialize {
            path: self.path.clone(),
            source,
        })?;

        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&temp, &self.path).map_err(|e| self.io_error(e))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// Shared in-process map. Clones see the same contents.
pub struct MemoryBackend<V> {
    entries: Arc<Mutex<BTreeMap<String, V>>>,
}

impl<V> MemoryBackend<V> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    pub fn with_entries(entries: BTreeMap<String, V>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }
}

impl<V: Clone> MemoryBackend<V> {
    /// What was last saved
    pub fn snapshot(&self) -> BTreeMap<String, V> {
        self.entries.lock().clone()
    }
}

impl<V> Clone for MemoryBackend<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for MemoryBackend<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send> Persistence<V> for MemoryBackend<V> {
    fn load_all(&self) -> StoreResult<BTreeMap<String, V>> {
        Ok(self.entries.lock().clone())
    }

    fn save_all(&self, entries: &BTreeMap<String, V>) -> StoreResult<()> {
        *self.entries.lock() = entries.clone();
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

// ============================================================================
// Record store
// ============================================================================

/// Cached map over a persistence backend
pub struct RecordStore<V> {
    backend: Box<dyn Persistence<V>>,
    entries: RwLock<BTreeMap<String, V>>,
}

/// Player records keyed by name
pub type PlayerStore = RecordStore<PlayerRecord>;

impl<V: Clone + 'static> RecordStore<V> {
    /// Open a store, loading everything the backend holds
    pub fn open(backend: impl Persistence<V> + 'static) -> StoreResult<Self> {
        let entries = backend.load_all()?;
        log::debug!(
            "Opened store {} with {} entries",
            backend.location(),
            entries.len()
        );
        Ok(Self {
            backend: Box::new(backend),
            entries: RwLock::new(entries),
        })
    }

    /// Open a JSON file store
    pub fn json_file<P: AsRef<Path>>(path: P) -> StoreResult<Self>
    where
        V: Serialize + DeserializeOwned,
    {
        Self::open(JsonFileBackend::new(path))
    }

    /// Open an empty in-memory store
    pub fn in_memory() -> Self
    where
        V: Send,
    {
        Self {
            backend: Box::new(MemoryBackend::new()),
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.entries.read().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// All entries in key order
    pub fn entries(&self) -> Vec<(String, V)> {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Insert `value` unless `key` exists. Returns whether it was inserted.
    pub fn insert_if_absent(&self, key: &str, value: V) -> StoreResult<bool> {
        let mut entries = self.entries.write();
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value);
        self.flush_locked(&entries)?;
        Ok(true)
    }

    /// Mutate an existing entry and flush. `None` when the key is absent.
    ///
    /// A failed flush is returned as an error; the cached entry keeps the
    /// mutation so a later flush can still persist it.
    pub fn update<T>(&self, key: &str, f: impl FnOnce(&mut V) -> T) -> StoreResult<Option<T>> {
        let mut entries = self.entries.write();
        let Some(value) = entries.get_mut(key) else {
            return Ok(None);
        };
        let out = f(value);
        self.flush_locked(&entries)?;
        Ok(Some(out))
    }

    /// Like [`update`](Self::update), but `f` may reject. The entry is only
    /// flushed when `f` succeeds, and `f` must not mutate before rejecting.
    pub fn try_update<T, E>(
        &self,
        key: &str,
        f: impl FnOnce(&mut V) -> Result<T, E>,
    ) -> Result<Option<T>, E>
    where
        E: From<StoreError>,
    {
        let mut entries = self.entries.write();
        let Some(value) = entries.get_mut(key) else {
            return Ok(None);
        };
        let out = f(value)?;
        self.flush_locked(&entries)?;
        Ok(Some(out))
    }

    /// Mutate an entry, creating it with `default` first if absent
    pub fn upsert<T>(
        &self,
        key: &str,
        default: impl FnOnce() -> V,
        f: impl FnOnce(&mut V) -> T,
    ) -> StoreResult<T> {
        let mut entries = self.entries.write();
        let out = f(entries.entry(key.to_string()).or_insert_with(default));
        self.flush_locked(&entries)?;
        Ok(out)
    }

    /// Write the cache back to the backend
    pub fn flush(&self) -> StoreResult<()> {
        let entries = self.entries.write();
        self.flush_locked(&entries)
    }

    /// Discard the cache and load again from the backend
    pub fn reload(&self) -> StoreResult<()> {
        let mut entries = self.entries.write();
        *entries = self.backend.load_all()?;
        Ok(())
    }

    fn flush_locked(&self, entries: &BTreeMap<String, V>) -> StoreResult<()> {
        self.backend.save_all(entries).inspect_err(|e| {
            log::error!("Failed to save {}: {}", self.backend.location(), e);
        })
    }
}
