use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

// 1. SessionStorage Contract

/// SessionStorage
///
/// Defines the abstract contract for the durable client-side storage that
/// holds the session entries (the bearer token and the serialized user
/// payload). The trait allows swapping the concrete backend—from the
/// on-disk store (FileStorage) in the binary to the in-memory map
/// (MemoryStorage) during testing—without affecting the SessionStore.
///
/// Reads are always fresh: implementations must not serve values removed by
/// a prior call, so a logout is immediately visible to the next gate
/// evaluation.
pub trait SessionStorage: Send + Sync {
    /// Returns the stored value for `key`, or `None` when absent or when the
    /// backend cannot be read (a corrupt store reads as empty, never panics).
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any prior value.
    fn set(&self, key: &str, value: &str) -> Result<(), String>;

    /// Removes `key`. Removing an absent key is a no-op; backend I/O
    /// failures are logged and swallowed so that logout stays unconditional.
    fn remove(&self, key: &str);
}

/// StorageState
///
/// The concrete type used to share the storage backend across the client.
pub type StorageState = Arc<dyn SessionStorage>;

// 2. The In-Memory Implementation

/// MemoryStorage
///
/// A process-local backend over a mutex-guarded map. Used by tests and by
/// hosts that do not want sessions to survive a restart.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A poisoned lock still holds a usable map; recover it.
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}

// 3. The On-Disk Implementation

/// FileStorage
///
/// Durable storage backed by a single JSON object file, the desktop
/// counterpart of a browser's localStorage. Every operation re-reads the
/// file, so concurrent client instances observe each other's logouts.
///
/// A missing or unparseable file is treated as an empty store: corrupt
/// session state must degrade to "not authenticated", never to a crash.
#[derive(Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> HashMap<String, String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return HashMap::new(),
        };

        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e,
                    "session file is not valid JSON; treating store as empty");
                HashMap::new()
            }
        }
    }

    fn save(&self, map: &HashMap<String, String>) -> Result<(), String> {
        let raw = serde_json::to_string_pretty(map).map_err(|e| e.to_string())?;
        std::fs::write(&self.path, raw)
            .map_err(|e| format!("failed to write {}: {}", self.path.display(), e))
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.load().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        let mut map = self.load();
        map.insert(key.to_string(), value.to_string());
        self.save(&map)
    }

    fn remove(&self, key: &str) {
        let mut map = self.load();
        if map.remove(key).is_some() {
            if let Err(e) = self.save(&map) {
                tracing::warn!(error = %e, "failed to persist session entry removal");
            }
        }
    }
}
