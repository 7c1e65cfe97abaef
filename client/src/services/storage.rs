//! # Key-Value Storage
//!
//! Implementations of [`KeyValueStore`]:
//!
//! - [`MemoryKeyValueStore`]: process-local map, used in tests and as a
//!   fallback when no data directory is writable
//! - [`FileKeyValueStore`]: a single JSON object on disk, rewritten atomically
//!   (temp file + rename) on every mutation

use crate::core::error::Result;
use crate::core::service::KeyValueStore;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// JSON-file key-value store.
///
/// The whole file is one JSON object of string values. Mutations are
/// serialized through an async mutex and written to a sibling temp file that
/// is renamed over the original, so a crash never leaves a torn file.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    owner_only: bool,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            owner_only: false,
            write_lock: Mutex::new(()),
        }
    }

    /// Store whose file is readable by the owner only (mode 0600 on unix).
    /// Used for credentials.
    pub fn owner_only(path: impl Into<PathBuf>) -> Self {
        Self {
            owner_only: true,
            ..Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&tmp, contents).await?;

        #[cfg(unix)]
        {
            if self.owner_only {
                use std::os::unix::fs::PermissionsExt;
                tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
            }
        }

        tokio::fs::rename(&tmp, &self.path).await?;
        tracing::trace!(path = %self.path.display(), keys = entries.len(), "Key-value file written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key).is_some() {
            self.write_all(&entries).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;

    #[tokio::test]
    async fn test_memory_store_set_get_remove() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("k", "v".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
        assert_eq!(store.len(), 1);

        store.remove("k").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let store = FileKeyValueStore::new(&path);
        store.set("a", "1".to_string()).await.unwrap();
        store.set("b", "2".to_string()).await.unwrap();
        store.remove("a").await.unwrap();

        let reopened = FileKeyValueStore::new(&path);
        assert_eq!(reopened.get("a").await.unwrap(), None);
        assert_eq!(reopened.get("b").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get("anything").await.unwrap(), None);
        // Removing from a missing file does not create it
        store.remove("anything").await.unwrap();
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileKeyValueStore::new(&path);
        assert!(matches!(store.get("k").await, Err(AppError::Storage(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_owner_only_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let store = FileKeyValueStore::owner_only(&path);
        store.set("token", "secret".to_string()).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
