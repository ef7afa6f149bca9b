//! In-memory port fakes shared by the use case tests

use crate::ports::generation::{GenerationGateway, ProviderError};
use crate::ports::job_queue::{Delivery, JobQueue, QueueError};
use crate::ports::object_store::{ObjectStore, StoreError};
use crate::ports::status_store::StatusStore;
use crate::ports::webhook::{WebhookError, WebhookNotifier};
use async_trait::async_trait;
use council_domain::{
    BlobKey, Job, JobId, JobStatus, ModelId, QueueMessage, ReviewConfig, Role, WebhookPayload,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Gateway that echoes `{model}@{temperature}` and can be switched to fail
#[derive(Default)]
pub struct EchoGateway {
    pub failing: AtomicBool,
    pub calls: AtomicUsize,
}

impl EchoGateway {
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.failing.store(true, Ordering::SeqCst);
        gateway
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl GenerationGateway for EchoGateway {
    async fn generate(
        &self,
        _prompt: &str,
        model: &ModelId,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::with_status(503, "upstream unavailable"));
        }
        Ok(format!("{}@{}", model, temperature))
    }
}

#[derive(Default)]
pub struct MemoryObjects {
    pub blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryObjects {
    pub fn contains(&self, key: &BlobKey) -> bool {
        self.blobs.lock().unwrap().contains_key(&key.to_string())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjects {
    async fn put(&self, key: &BlobKey, data: Vec<u8>) -> Result<(), StoreError> {
        self.blobs.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>, StoreError> {
        self.blobs
            .lock()
            .unwrap()
            .get(&key.to_string())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &BlobKey) -> Result<(), StoreError> {
        self.blobs.lock().unwrap().remove(&key.to_string());
        Ok(())
    }
}

/// Status store that also records every status it was asked to write
#[derive(Default)]
pub struct MemoryStatuses {
    pub jobs: Mutex<HashMap<JobId, Job>>,
    pub writes: Mutex<Vec<JobStatus>>,
}

impl MemoryStatuses {
    pub fn job(&self, id: &JobId) -> Option<Job> {
        self.jobs.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl StatusStore for MemoryStatuses {
    async fn get(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.lock().unwrap().get(id).cloned())
    }

    async fn put(&self, job: &Job) -> Result<(), StoreError> {
        self.writes.lock().unwrap().push(job.status);
        self.jobs.lock().unwrap().insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: &JobId,
        change: &(dyn for<'j> Fn(&'j mut Job) + Send + Sync),
    ) -> Result<bool, StoreError> {
        let mut jobs = self.jobs.lock().unwrap();
        let Some(job) = jobs.get_mut(id) else {
            return Ok(false);
        };
        change(job);
        self.writes.lock().unwrap().push(job.status);
        Ok(true)
    }

    async fn delete(&self, id: &JobId) -> Result<(), StoreError> {
        self.jobs.lock().unwrap().remove(id);
        Ok(())
    }
}

/// Queue that hands out pending deliveries and records every settlement.
///
/// `receive` returns `None` once nothing is pending, which the worker treats
/// as a closed queue.
#[derive(Default)]
pub struct MemoryQueue {
    pub pending: Mutex<VecDeque<Delivery>>,
    pub acked: Mutex<Vec<Delivery>>,
    pub retried: Mutex<Vec<Delivery>>,
    pub dead: Mutex<Vec<(Delivery, String)>>,
}

impl MemoryQueue {
    pub fn enqueued(&self) -> Vec<QueueMessage> {
        self.pending
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.message.clone())
            .collect()
    }
}

#[async_trait]
impl JobQueue for MemoryQueue {
    async fn enqueue(&self, message: QueueMessage) -> Result<(), QueueError> {
        self.pending.lock().unwrap().push_back(Delivery::first(message));
        Ok(())
    }

    async fn receive(&self) -> Option<Delivery> {
        self.pending.lock().unwrap().pop_front()
    }

    async fn ack(&self, delivery: &Delivery) -> Result<(), QueueError> {
        self.acked.lock().unwrap().push(delivery.clone());
        Ok(())
    }

    async fn retry(&self, delivery: &Delivery) -> Result<(), QueueError> {
        self.retried.lock().unwrap().push(delivery.clone());
        self.pending.lock().unwrap().push_back(Delivery {
            message: delivery.message.clone(),
            attempt: delivery.attempt + 1,
        });
        Ok(())
    }

    async fn dead_letter(&self, delivery: &Delivery, reason: &str) -> Result<(), QueueError> {
        self.dead
            .lock()
            .unwrap()
            .push((delivery.clone(), reason.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingWebhook {
    pub failing: AtomicBool,
    pub sent: Mutex<Vec<(String, WebhookPayload)>>,
}

#[async_trait]
impl WebhookNotifier for RecordingWebhook {
    async fn notify(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError> {
        self.sent
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        if self.failing.load(Ordering::SeqCst) {
            return Err(WebhookError::Status(500));
        }
        Ok(())
    }
}

/// A valid config with instructions for every default seat
pub fn review_config() -> ReviewConfig {
    let mut config = ReviewConfig::default().with_operational_context("Test operations");
    let roles: Vec<Role> = config.all_roles().cloned().collect();
    for role in roles {
        config = config.with_instruction(role.clone(), format!("You are the {}.", role));
    }
    config
}
