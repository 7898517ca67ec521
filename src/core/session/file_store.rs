//! JSON-file key-value store, the native counterpart of localStorage.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::store::KeyValueStore;

/// Durable store persisting all entries as one JSON object in a file.
///
/// Entries are loaded once on open and written back on every change.
/// I/O failures are logged and leave the in-memory view updated.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable session file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read session file");
                BTreeMap::new()
            }
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) {
        let raw = match serde_json::to_string_pretty(entries) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode session file");
                return;
            }
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "failed to create session directory");
                return;
            }
        }
        if let Err(e) = std::fs::write(&self.path, raw) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write session file");
        }
    }
}

impl KeyValueStore for FileStore {
    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries();
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("auth-session-{}", uuid::Uuid::new_v4()))
            .join("session.json")
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = FileStore::open(temp_path());
        assert_eq!(store.get("usertoken"), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path();
        FileStore::open(&path).set("usertoken", "h.p.s");

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("usertoken").as_deref(), Some("h.p.s"));

        reopened.remove("usertoken");
        assert_eq!(FileStore::open(&path).get("usertoken"), None);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("usertoken"), None);

        store.set("usertoken", "fresh");
        assert_eq!(FileStore::open(&path).get("usertoken").as_deref(), Some("fresh"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
