//! Application layer for cxo-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DispatchParams;
pub use ports::{
    generation::{GenerationGateway, ProviderError},
    job_queue::{Delivery, JobQueue, QueueError},
    object_store::{ObjectStore, StoreError},
    progress::{ChannelProgressSink, CompositeProgressSink, NoProgress, ProgressSink},
    status_store::StatusStore,
    webhook::{NoWebhook, WebhookError, WebhookNotifier},
};
pub use use_cases::job_service::{JobService, JobServiceError, SubmitReviewInput};
pub use use_cases::process_job::{DispatchOutcome, ProcessJobError, ProcessJobUseCase};
pub use use_cases::run_review::{RunReviewError, RunReviewInput, RunReviewUseCase};
pub use use_cases::worker::{Worker, WorkerStats};
