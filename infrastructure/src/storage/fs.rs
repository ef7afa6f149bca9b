//! Filesystem object store
//!
//! Layout under the data directory:
//!
//! ```text
//! {data_dir}/document/{job_id}.md
//! {data_dir}/config/{job_id}.json
//! {data_dir}/result/{job_id}.json
//! ```

use async_trait::async_trait;
use council_application::{ObjectStore, StoreError};
use council_domain::{BlobKey, BlobKind};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a blob; job ids are restricted to `[A-Za-z0-9-]`, so the
    /// result always stays inside the data directory.
    pub fn path_for(&self, key: &BlobKey) -> PathBuf {
        let ext = match key.kind {
            BlobKind::Document => "md",
            BlobKind::Config | BlobKind::Result => "json",
        };
        self.root
            .join(key.kind.as_str())
            .join(format!("{}.{}", key.job_id, ext))
    }
}

fn backend(key: &BlobKey, e: std::io::Error) -> StoreError {
    StoreError::Backend(format!("{}: {}", key, e))
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &BlobKey, data: Vec<u8>) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| backend(key, e))?;
        }

        // Write to a sibling temp file first so readers never see a partial blob.
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &data).await.map_err(|e| backend(key, e))?;
        fs::rename(&tmp, &path).await.map_err(|e| backend(key, e))?;
        debug!("Stored {} ({} bytes)", key, data.len());
        Ok(())
    }

    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>, StoreError> {
        match fs::read(self.path_for(key)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(key.to_string())),
            Err(e) => Err(backend(key, e)),
        }
    }

    async fn delete(&self, key: &BlobKey) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(backend(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::JobId;
    use tempfile::TempDir;

    #[test]
    fn test_layout() {
        let store = FsObjectStore::new("/data");
        let id = JobId::parse("abc-1").unwrap();
        assert_eq!(
            store.path_for(&BlobKey::document(&id)),
            PathBuf::from("/data/document/abc-1.md")
        );
        assert_eq!(
            store.path_for(&BlobKey::result(&id)),
            PathBuf::from("/data/result/abc-1.json")
        );
    }

    #[tokio::test]
    async fn test_round_trip_and_delete() {
        let dir = TempDir::new().unwrap();
        let store = FsObjectStore::new(dir.path());
        let id = JobId::generate();
        let key = BlobKey::config(&id);

        store.put(&key, br#"{"reviewers":["CTO"]}"#.to_vec()).await.unwrap();
        assert!(store.path_for(&key).exists());
        assert_eq!(store.get(&key).await.unwrap(), br#"{"reviewers":["CTO"]}"#);
        assert!(!store.path_for(&key).with_extension("tmp").exists());

        store.delete_job(&id).await.unwrap();
        assert!(store.get(&key).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let store = FsObjectStore::new(dir.path());
        let key = BlobKey::result(&JobId::generate());

        store.put(&key, b"first".to_vec()).await.unwrap();
        store.put(&key, b"second".to_vec()).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), b"second");
    }
}
