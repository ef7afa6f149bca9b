//! Queue worker
//!
//! Pulls deliveries one at a time and hands them to the dispatcher. Several
//! workers may share one queue; each processes a single job at a time.

use crate::ports::generation::GenerationGateway;
use crate::ports::job_queue::JobQueue;
use crate::ports::progress::{NoProgress, ProgressSink};
use crate::use_cases::process_job::{DispatchOutcome, ProcessJobUseCase};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Counts of how deliveries were settled during a worker run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub completed: usize,
    pub retried: usize,
    pub dead_lettered: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl WorkerStats {
    fn record(&mut self, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Completed => self.completed += 1,
            DispatchOutcome::Retrying => self.retried += 1,
            DispatchOutcome::DeadLettered => self.dead_lettered += 1,
            DispatchOutcome::Skipped => self.skipped += 1,
        }
    }
}

pub struct Worker<G: GenerationGateway + 'static> {
    dispatcher: Arc<ProcessJobUseCase<G>>,
    queue: Arc<dyn JobQueue>,
    shutdown: CancellationToken,
}

impl<G: GenerationGateway + 'static> Worker<G> {
    pub fn new(dispatcher: Arc<ProcessJobUseCase<G>>, queue: Arc<dyn JobQueue>) -> Self {
        Self {
            dispatcher,
            queue,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Token that stops the worker once cancelled.
    ///
    /// Cancellation only stops pulling new deliveries; a job already in
    /// progress runs to the end of its attempt.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn run(&self) -> WorkerStats {
        self.run_with_progress(&NoProgress).await
    }

    /// Process deliveries until shutdown or until the queue closes
    pub async fn run_with_progress(&self, observer: &dyn ProgressSink) -> WorkerStats {
        let mut stats = WorkerStats::default();
        info!("Worker started");

        loop {
            let delivery = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    debug!("Worker shutdown requested");
                    break;
                }
                delivery = self.queue.receive() => delivery,
            };

            let Some(delivery) = delivery else {
                debug!("Queue closed");
                break;
            };

            match self.dispatcher.execute(&delivery, observer).await {
                Ok(outcome) => {
                    debug!("Job {} settled: {:?}", delivery.message.job_id, outcome);
                    stats.record(outcome);
                }
                Err(e) => {
                    // The delivery could not be settled normally; park it so
                    // it is not lost silently.
                    warn!("Dispatch of {} failed: {}", delivery.message.job_id, e);
                    stats.errors += 1;
                    if let Err(e) = self.queue.dead_letter(&delivery, &e.to_string()).await {
                        warn!("Failed to dead-letter {}: {}", delivery.message.job_id, e);
                    }
                }
            }
        }

        info!(
            "Worker stopped ({} completed, {} retried, {} dead-lettered)",
            stats.completed, stats.retried, stats.dead_lettered
        );
        stats
    }
}
