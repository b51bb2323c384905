use intern_portal_client::storage::{FileStorage, MemoryStorage, SessionStorage};
use std::path::PathBuf;

// --- Memory Backend ---

#[test]
fn memory_round_trip() {
    let storage = MemoryStorage::new();

    assert_eq!(storage.get("token"), None);

    storage.set("token", "abc").unwrap();
    assert_eq!(storage.get("token"), Some("abc".to_string()));

    storage.set("token", "def").unwrap();
    assert_eq!(storage.get("token"), Some("def".to_string()));

    storage.remove("token");
    assert_eq!(storage.get("token"), None);
}

#[test]
fn memory_remove_is_idempotent() {
    let storage = MemoryStorage::new();
    storage.remove("never-set");
    storage.remove("never-set");
    assert_eq!(storage.get("never-set"), None);
}

// --- File Backend ---

/// A unique temp path per test; removed on drop so reruns start clean.
struct TempSessionFile(PathBuf);

impl TempSessionFile {
    fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "portal-storage-test-{}-{}.json",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        Self(path)
    }
}

impl Drop for TempSessionFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn file_round_trip() {
    let file = TempSessionFile::new("round-trip");
    let storage = FileStorage::new(file.0.clone());

    assert_eq!(storage.get("token"), None);

    storage.set("token", "abc").unwrap();
    storage.set("user", "{\"accessToken\":\"abc\"}").unwrap();
    assert_eq!(storage.get("token"), Some("abc".to_string()));

    storage.remove("token");
    assert_eq!(storage.get("token"), None);
    assert_eq!(storage.get("user"), Some("{\"accessToken\":\"abc\"}".to_string()));
}

#[test]
fn file_survives_reopen() {
    let file = TempSessionFile::new("reopen");

    {
        let storage = FileStorage::new(file.0.clone());
        storage.set("token", "persisted").unwrap();
    }

    // A fresh instance over the same path sees the prior write.
    let reopened = FileStorage::new(file.0.clone());
    assert_eq!(reopened.get("token"), Some("persisted".to_string()));
}

#[test]
fn missing_file_reads_as_empty() {
    let file = TempSessionFile::new("missing");
    let storage = FileStorage::new(file.0.clone());

    assert_eq!(storage.get("anything"), None);
}

#[test]
fn corrupt_file_reads_as_empty() {
    let file = TempSessionFile::new("corrupt");
    std::fs::write(&file.0, "not json at all").unwrap();

    let storage = FileStorage::new(file.0.clone());
    assert_eq!(storage.get("token"), None);

    // Writing through the corrupt store recovers it.
    storage.set("token", "fresh").unwrap();
    assert_eq!(storage.get("token"), Some("fresh".to_string()));
}
