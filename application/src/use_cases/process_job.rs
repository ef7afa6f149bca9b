//! Process Job use case
//!
//! The dispatcher: takes one queue delivery through a complete attempt.
//!
//! ```text
//! load record ──► begin attempt ──► load blobs ──► run engine ──► persist result
//!     │                                  │              │               │
//!  unknown/completed               failure ────────────┴───────────────┘
//!     ▼                                  ▼
//! dead-letter / ack            mark failed, notify, retry or dead-letter
//! ```
//!
//! Every attempt starts again from stage 1; nothing from a failed attempt is
//! kept.

use crate::config::DispatchParams;
use crate::ports::generation::GenerationGateway;
use crate::ports::job_queue::{Delivery, JobQueue, QueueError};
use crate::ports::object_store::{ObjectStore, StoreError};
use crate::ports::progress::{ChannelProgressSink, CompositeProgressSink, ProgressSink};
use crate::ports::status_store::StatusStore;
use crate::ports::webhook::WebhookNotifier;
use crate::use_cases::run_review::{RunReviewError, RunReviewInput, RunReviewUseCase};
use chrono::Utc;
use council_domain::{
    BlobKey, DomainError, Job, JobId, JobStatus, QueueMessage, ReviewConfig, ReviewResult,
    StageProgress, WebhookPayload,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Errors that stop the dispatcher from settling a delivery.
///
/// Failures of the review itself are not errors here: they are recorded on
/// the job and reported through [`DispatchOutcome`].
#[derive(Error, Debug)]
pub enum ProcessJobError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// How a delivery was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Review finished and the result was stored
    Completed,
    /// Attempt failed and the message was handed back for another attempt
    Retrying,
    /// Message was removed from the queue permanently
    DeadLettered,
    /// Nothing to do (job already completed or deleted mid-run)
    Skipped,
}

/// Why a single attempt failed
#[derive(Error, Debug)]
enum AttemptError {
    #[error("Failed to load job input: {0}")]
    Input(StoreError),

    #[error(transparent)]
    Review(#[from] RunReviewError),

    #[error("Failed to store result: {0}")]
    Output(StoreError),
}

/// Use case for dispatching queued review jobs
pub struct ProcessJobUseCase<G: GenerationGateway + 'static> {
    engine: RunReviewUseCase<G>,
    objects: Arc<dyn ObjectStore>,
    statuses: Arc<dyn StatusStore>,
    queue: Arc<dyn JobQueue>,
    webhook: Arc<dyn WebhookNotifier>,
    params: DispatchParams,
}

impl<G: GenerationGateway + 'static> ProcessJobUseCase<G> {
    pub fn new(
        gateway: Arc<G>,
        objects: Arc<dyn ObjectStore>,
        statuses: Arc<dyn StatusStore>,
        queue: Arc<dyn JobQueue>,
        webhook: Arc<dyn WebhookNotifier>,
        params: DispatchParams,
    ) -> Self {
        Self {
            engine: RunReviewUseCase::new(gateway).with_temperatures(params.temperatures),
            objects,
            statuses,
            queue,
            webhook,
            params,
        }
    }

    /// Take one delivery through an attempt and settle it on the queue.
    ///
    /// `observer` receives the same progress events that are written to the
    /// status record.
    pub async fn execute(
        &self,
        delivery: &Delivery,
        observer: &dyn ProgressSink,
    ) -> Result<DispatchOutcome, ProcessJobError> {
        let job_id = &delivery.message.job_id;

        let Some(mut job) = self.statuses.get(job_id).await? else {
            warn!("No status record for job {}, dead-lettering", job_id);
            self.queue.dead_letter(delivery, "unknown job").await?;
            return Ok(DispatchOutcome::DeadLettered);
        };

        if job.status == JobStatus::Completed {
            info!("Job {} already completed, skipping redelivery", job_id);
            self.queue.ack(delivery).await?;
            return Ok(DispatchOutcome::Skipped);
        }

        job.begin_attempt(Utc::now())?;
        self.statuses.put(&job).await?;
        info!(
            "Processing job {} (attempt {}/{})",
            job_id, delivery.attempt, self.params.max_attempts
        );

        let attempt = self.run_attempt(&delivery.message, observer).await;

        // Progress writes may have landed since we last read the record.
        let Some(mut job) = self.statuses.get(job_id).await? else {
            warn!("Job {} was deleted while processing", job_id);
            if let Err(e) = self.objects.delete_job(job_id).await {
                debug!("Failed to clean up blobs for {}: {}", job_id, e);
            }
            self.queue.ack(delivery).await?;
            return Ok(DispatchOutcome::Skipped);
        };

        match attempt {
            Ok(_) => {
                job.complete(Utc::now())?;
                self.statuses.put(&job).await?;
                info!("Job {} completed", job_id);

                self.notify(&job, &delivery.message).await;
                self.queue.ack(delivery).await?;
                Ok(DispatchOutcome::Completed)
            }
            Err(e) => {
                let reason = e.to_string();
                job.fail(Utc::now(), reason.clone())?;
                self.statuses.put(&job).await?;
                warn!("Job {} failed on attempt {}: {}", job_id, delivery.attempt, reason);

                self.notify(&job, &delivery.message).await;
                if delivery.attempt < self.params.max_attempts {
                    self.queue.retry(delivery).await?;
                    Ok(DispatchOutcome::Retrying)
                } else {
                    warn!(
                        "Job {} exhausted {} attempts, dead-lettering",
                        job_id, self.params.max_attempts
                    );
                    self.queue.dead_letter(delivery, &reason).await?;
                    Ok(DispatchOutcome::DeadLettered)
                }
            }
        }
    }

    async fn run_attempt(
        &self,
        message: &QueueMessage,
        observer: &dyn ProgressSink,
    ) -> Result<ReviewResult, AttemptError> {
        let (document, config) = self.load_input(message).await.map_err(AttemptError::Input)?;

        let (channel, updates) = ChannelProgressSink::new();
        let updater = tokio::spawn(drain_progress(
            Arc::clone(&self.statuses),
            message.job_id.clone(),
            updates,
        ));

        let review = {
            let sink = CompositeProgressSink::new(vec![&channel as &dyn ProgressSink, observer]);
            self.engine
                .execute_with_progress(RunReviewInput::new(document, config), &sink)
                .await
        };

        // Closing the channel lets the updater finish; it must be done before
        // the terminal status write so it cannot overwrite it.
        drop(channel);
        if let Err(e) = updater.await {
            warn!("Progress updater for {} panicked: {}", message.job_id, e);
        }

        let result = review?;
        let bytes = serde_json::to_vec(&result)
            .map_err(|e| AttemptError::Output(StoreError::from(e)))?;
        self.objects
            .put(&BlobKey::result(&message.job_id), bytes)
            .await
            .map_err(AttemptError::Output)?;

        Ok(result)
    }

    async fn load_input(&self, message: &QueueMessage) -> Result<(String, ReviewConfig), StoreError> {
        let document = self.objects.get(&message.document_ref).await?;
        let document = String::from_utf8(document)
            .map_err(|e| StoreError::Serialization(format!("document is not UTF-8: {}", e)))?;
        let config: ReviewConfig = serde_json::from_slice(&self.objects.get(&message.config_ref).await?)?;
        Ok((document, config))
    }

    /// Best-effort webhook; a failed notification never changes the job.
    async fn notify(&self, job: &Job, message: &QueueMessage) {
        let Some(url) = message.webhook_url.as_deref().or(job.webhook_url.as_deref()) else {
            return;
        };
        let payload = WebhookPayload::for_job(job, self.params.result_url_for(&job.id));
        match self.webhook.notify(url, &payload).await {
            Ok(()) => debug!("Webhook delivered for {} ({})", job.id, job.status),
            Err(e) => warn!("Webhook for {} failed: {}", job.id, e),
        }
    }
}

/// Apply progress markers to the status record until the sender closes.
///
/// A record that is gone stays gone.
async fn drain_progress(
    statuses: Arc<dyn StatusStore>,
    job_id: JobId,
    mut updates: mpsc::UnboundedReceiver<StageProgress>,
) {
    while let Some(progress) = updates.recv().await {
        let change = move |job: &mut Job| job.set_progress(progress.clone());
        match statuses.update(&job_id, &change).await {
            Ok(true) => {}
            Ok(false) => debug!("No status record for {}, dropping progress", job_id),
            Err(e) => debug!("Progress update for {} failed: {}", job_id, e),
        }
    }
}
