//! Durable object store port
//!
//! Holds the three blobs of a job (document, config, result), addressed by
//! [`BlobKey`]. Writes are expected once per kind per job in the happy path.

use async_trait::async_trait;
use council_domain::{BlobKey, BlobKind, JobId};
use thiserror::Error;

/// Errors shared by the object and status stores
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Content store for per-job blobs
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store a blob, replacing any previous content under the same key
    async fn put(&self, key: &BlobKey, data: Vec<u8>) -> Result<(), StoreError>;

    /// Read a blob; returns [`StoreError::NotFound`] when absent
    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>, StoreError>;

    /// Delete a blob. Succeeds even if the blob does not exist.
    async fn delete(&self, key: &BlobKey) -> Result<(), StoreError>;

    /// Delete every blob kind belonging to a job
    async fn delete_job(&self, job_id: &JobId) -> Result<(), StoreError> {
        for kind in BlobKind::ALL {
            self.delete(&BlobKey::new(kind, job_id.clone())).await?;
        }
        Ok(())
    }
}
