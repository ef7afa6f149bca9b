//! Job status store port
//!
//! A small key-value store of [`Job`] records keyed by job id.
//!
//! # Consistency
//!
//! Updates are read-modify-write without transactions. The dispatcher's
//! status writes and the engine's progress writes may interleave, and the
//! last write wins. Records are partitioned by job id, so this only ever
//! affects writers of the same job. Implementations may expire records after
//! a retention period; an expired record reads as absent.

use super::object_store::StoreError;
use async_trait::async_trait;
use council_domain::{Job, JobId};

#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Read a job record, `None` when unknown or expired
    async fn get(&self, id: &JobId) -> Result<Option<Job>, StoreError>;

    /// Write a job record, overwriting whatever is stored
    async fn put(&self, job: &Job) -> Result<(), StoreError>;

    /// Apply `change` to an existing record and write it back.
    ///
    /// Returns `false`, writing nothing, when the record is absent.
    /// Implementations should make this atomic with respect to
    /// [`Self::delete`] so a deleted job is never brought back; the default
    /// is a plain get followed by put.
    async fn update(
        &self,
        id: &JobId,
        change: &(dyn for<'j> Fn(&'j mut Job) + Send + Sync),
    ) -> Result<bool, StoreError> {
        let Some(mut job) = self.get(id).await? else {
            return Ok(false);
        };
        change(&mut job);
        self.put(&job).await?;
        Ok(true)
    }

    /// Remove a job record. Succeeds even if it does not exist.
    async fn delete(&self, id: &JobId) -> Result<(), StoreError>;
}
