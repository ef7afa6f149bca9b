//! Job service
//!
//! Ingress for council reviews: accepts submissions, answers status and
//! result queries, and deletes jobs on request.

use crate::ports::job_queue::{JobQueue, QueueError};
use crate::ports::object_store::{ObjectStore, StoreError};
use crate::ports::status_store::StatusStore;
use chrono::Utc;
use council_domain::{
    BlobKey, Job, JobId, JobStatus, QueueMessage, ReviewConfig, ReviewResult,
    is_valid_webhook_url,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum JobServiceError {
    #[error("Invalid submission: {0}")]
    Validation(String),

    #[error("Job not found: {0}")]
    NotFound(JobId),

    #[error("Job is not complete (status: {0})")]
    NotReady(JobStatus),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),
}

/// A review submission
#[derive(Debug, Clone)]
pub struct SubmitReviewInput {
    pub document: String,
    pub config: ReviewConfig,
    pub webhook_url: Option<String>,
}

impl SubmitReviewInput {
    pub fn new(document: impl Into<String>, config: ReviewConfig) -> Self {
        Self {
            document: document.into(),
            config,
            webhook_url: None,
        }
    }

    pub fn with_webhook(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    fn validate(&self) -> Result<(), JobServiceError> {
        if self.document.trim().is_empty() {
            return Err(JobServiceError::Validation("document is empty".into()));
        }
        self.config
            .validate()
            .map_err(|e| JobServiceError::Validation(e.to_string()))?;
        if let Some(url) = &self.webhook_url
            && !is_valid_webhook_url(url)
        {
            return Err(JobServiceError::Validation(format!(
                "webhook URL must be an absolute http(s) URL: {}",
                url
            )));
        }
        Ok(())
    }
}

pub struct JobService {
    objects: Arc<dyn ObjectStore>,
    statuses: Arc<dyn StatusStore>,
    queue: Arc<dyn JobQueue>,
}

impl JobService {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        statuses: Arc<dyn StatusStore>,
        queue: Arc<dyn JobQueue>,
    ) -> Self {
        Self {
            objects,
            statuses,
            queue,
        }
    }

    /// Validate and enqueue a review.
    ///
    /// Blobs and the `queued` record are written before the message is
    /// enqueued, so a worker never sees a message whose inputs are missing.
    pub async fn submit(&self, input: SubmitReviewInput) -> Result<JobId, JobServiceError> {
        input.validate()?;

        let id = JobId::generate();
        let config = serde_json::to_vec(&input.config).map_err(StoreError::from)?;
        self.objects
            .put(&BlobKey::document(&id), input.document.into_bytes())
            .await?;
        self.objects.put(&BlobKey::config(&id), config).await?;

        let job = Job::queued(id.clone(), input.webhook_url.clone(), Utc::now());
        self.statuses.put(&job).await?;
        self.queue
            .enqueue(QueueMessage::for_job(&id, input.webhook_url))
            .await?;

        info!("Submitted job {}", id);
        Ok(id)
    }

    pub async fn get_status(&self, id: &JobId) -> Result<Job, JobServiceError> {
        self.statuses
            .get(id)
            .await?
            .ok_or_else(|| JobServiceError::NotFound(id.clone()))
    }

    pub async fn get_result(&self, id: &JobId) -> Result<ReviewResult, JobServiceError> {
        let job = self.get_status(id).await?;
        if job.status != JobStatus::Completed {
            return Err(JobServiceError::NotReady(job.status));
        }

        let bytes = match self.objects.get(&BlobKey::result(id)).await {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return Err(JobServiceError::NotFound(id.clone())),
            Err(e) => return Err(e.into()),
        };
        let result = serde_json::from_slice(&bytes).map_err(StoreError::from)?;
        Ok(result)
    }

    /// Remove the status record and every blob of a job
    pub async fn delete_job(&self, id: &JobId) -> Result<(), JobServiceError> {
        if self.statuses.get(id).await?.is_none() {
            return Err(JobServiceError::NotFound(id.clone()));
        }
        self.statuses.delete(id).await?;
        self.objects.delete_job(id).await?;
        debug!("Deleted job {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatchParams;
    use crate::ports::progress::NoProgress;
    use crate::ports::webhook::NoWebhook;
    use crate::use_cases::process_job::ProcessJobUseCase;
    use crate::use_cases::testing::{
        EchoGateway, MemoryObjects, MemoryQueue, MemoryStatuses, review_config,
    };
    use council_domain::Role;

    struct Fixture {
        objects: Arc<MemoryObjects>,
        statuses: Arc<MemoryStatuses>,
        queue: Arc<MemoryQueue>,
        service: JobService,
    }

    fn fixture() -> Fixture {
        let objects = Arc::new(MemoryObjects::default());
        let statuses = Arc::new(MemoryStatuses::default());
        let queue = Arc::new(MemoryQueue::default());
        let service = JobService::new(objects.clone(), statuses.clone(), queue.clone());
        Fixture {
            objects,
            statuses,
            queue,
            service,
        }
    }

    async fn process_next(fx: &Fixture) {
        let dispatcher = ProcessJobUseCase::new(
            Arc::new(EchoGateway::default()),
            fx.objects.clone(),
            fx.statuses.clone(),
            fx.queue.clone(),
            Arc::new(NoWebhook),
            DispatchParams::default(),
        );
        let delivery = fx.queue.pending.lock().unwrap().pop_front().unwrap();
        dispatcher.execute(&delivery, &NoProgress).await.unwrap();
    }

    #[tokio::test]
    async fn test_submit_stores_inputs_and_enqueues() {
        let fx = fixture();
        let id = fx
            .service
            .submit(
                SubmitReviewInput::new("Adopt Kafka", review_config())
                    .with_webhook("https://hooks.example.com/council"),
            )
            .await
            .unwrap();

        assert!(fx.objects.contains(&BlobKey::document(&id)));
        assert!(fx.objects.contains(&BlobKey::config(&id)));

        let job = fx.service.get_status(&id).await.unwrap();
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.webhook_url.as_deref(), Some("https://hooks.example.com/council"));

        let enqueued = fx.queue.enqueued();
        assert_eq!(enqueued.len(), 1);
        assert_eq!(enqueued[0], QueueMessage::for_job(&id, job.webhook_url.clone()));
    }

    #[tokio::test]
    async fn test_submit_validation() {
        let fx = fixture();

        let err = fx
            .service
            .submit(SubmitReviewInput::new("   ", review_config()))
            .await
            .unwrap_err();
        assert!(matches!(err, JobServiceError::Validation(_)));

        let err = fx
            .service
            .submit(SubmitReviewInput::new("plan", review_config()).with_webhook("ftp://x"))
            .await
            .unwrap_err();
        assert!(matches!(err, JobServiceError::Validation(_)));

        let missing = review_config().with_reviewers(vec![Role::parse("CFO").unwrap()]);
        let err = fx
            .service
            .submit(SubmitReviewInput::new("plan", missing))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("CFO"));

        assert!(fx.queue.enqueued().is_empty());
        assert!(fx.statuses.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_result_not_ready_until_completed() {
        let fx = fixture();
        let id = fx
            .service
            .submit(SubmitReviewInput::new("plan", review_config()))
            .await
            .unwrap();

        let err = fx.service.get_result(&id).await.unwrap_err();
        assert!(matches!(err, JobServiceError::NotReady(JobStatus::Queued)));

        process_next(&fx).await;

        let first = fx.service.get_result(&id).await.unwrap();
        let second = fx.service.get_result(&id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.stage1.len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let fx = fixture();
        let id = JobId::generate();

        assert!(matches!(
            fx.service.get_status(&id).await,
            Err(JobServiceError::NotFound(_))
        ));
        assert!(matches!(
            fx.service.get_result(&id).await,
            Err(JobServiceError::NotFound(_))
        ));
        assert!(matches!(
            fx.service.delete_job(&id).await,
            Err(JobServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_everything() {
        let fx = fixture();
        let id = fx
            .service
            .submit(SubmitReviewInput::new("plan", review_config()))
            .await
            .unwrap();
        process_next(&fx).await;

        fx.service.delete_job(&id).await.unwrap();

        assert!(fx.statuses.job(&id).is_none());
        assert!(fx.objects.blobs.lock().unwrap().is_empty());
    }
}
