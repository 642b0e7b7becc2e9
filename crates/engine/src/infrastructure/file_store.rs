//! JSON file store: one file per key under a data directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::infrastructure::ports::{KeyValueStore, StoreError};

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing `key`. Characters outside `[A-Za-z0-9_-]` become `_`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(format!("{}.json", name))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::backend("get", e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::serialization(format!("{}: {}", path.display(), e)))
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::backend("set", e))?;

        let path = self.path_for(key);
        let bytes = serde_json::to_vec_pretty(&value).map_err(StoreError::serialization)?;

        // Write then rename so a crash never leaves a half-written record.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StoreError::backend("set", e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::backend("set", e))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::backend("remove", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_map_to_safe_file_names() {
        let store = FileStore::new("/data");
        assert_eq!(
            store.path_for("charsheet:character:1f2e"),
            PathBuf::from("/data/charsheet_character_1f2e.json")
        );
        assert_eq!(store.path_for("../etc"), PathBuf::from("/data/___etc.json"));
    }

    #[tokio::test]
    async fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", json!({"level": 3})).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!({"level": 3})));

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        tokio::fs::write(store.path_for("bad"), b"{not json").await.unwrap();

        let err = store.get("bad").await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
