//! In-memory status store with TTL retention
//!
//! Writes are last-write-wins: `put` replaces the whole record, so callers
//! doing read-modify-write may overwrite each other's fields. The dispatcher
//! orders its writes so the terminal status is always the last one.
//! [`StatusStore::update`] runs under the write lock, so it never recreates a
//! record deleted in the meantime.

use async_trait::async_trait;
use council_application::{StatusStore, StoreError};
use council_domain::{Job, JobId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default retention for status records (7 days)
pub const DEFAULT_STATUS_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone)]
struct Entry {
    job: Job,
    /// `None` when the TTL is too large to represent
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryStatusStore {
    entries: Arc<RwLock<HashMap<JobId, Entry>>>,
    ttl: Duration,
}

impl Default for InMemoryStatusStore {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_TTL)
    }
}

impl InMemoryStatusStore {
    /// Records expire `ttl` after their most recent write
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn expiry(&self) -> Option<Instant> {
        Instant::now().checked_add(self.ttl)
    }

    /// Drop every expired record, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let Ok(mut entries) = self.entries.write() else {
            return 0;
        };
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, e| e.is_live(now));
        before - entries.len()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".into())
}

#[async_trait]
impl StatusStore for InMemoryStatusStore {
    async fn get(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().map_err(|_| poisoned())?;
            match entries.get(id) {
                None => return Ok(None),
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.job.clone())),
                Some(_) => {}
            }
        }

        // Expired: purge lazily.
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if entries.get(id).is_some_and(|e| !e.is_live(now)) {
            entries.remove(id);
            debug!("Status record for {} expired", id);
        }
        Ok(None)
    }

    async fn put(&self, job: &Job) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(
            job.id.clone(),
            Entry {
                job: job.clone(),
                expires_at: self.expiry(),
            },
        );
        Ok(())
    }

    async fn update(
        &self,
        id: &JobId,
        change: &(dyn for<'j> Fn(&'j mut Job) + Send + Sync),
    ) -> Result<bool, StoreError> {
        let expires_at = self.expiry();
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        match entries.get_mut(id) {
            Some(entry) if entry.is_live(Instant::now()) => {
                change(&mut entry.job);
                entry.expires_at = expires_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: &JobId) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(id);
        Ok(())
    }
}
