//! In-process job queue
//!
//! A tokio channel with at-least-once semantics inside one process: retried
//! deliveries are re-sent after a delay with their attempt counter bumped,
//! and dead-lettered ones are parked for inspection.

use async_trait::async_trait;
use council_application::{Delivery, JobQueue, QueueError};
use council_domain::{JobId, QueueMessage};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, mpsc};
use tracing::{debug, warn};

/// A delivery that will not be retried
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLetter {
    pub delivery: Delivery,
    pub reason: String,
}

pub struct InMemoryJobQueue {
    sender: Mutex<Option<mpsc::UnboundedSender<Delivery>>>,
    receiver: AsyncMutex<mpsc::UnboundedReceiver<Delivery>>,
    dead_letters: Arc<Mutex<Vec<DeadLetter>>>,
    retry_delay: Duration,
}

impl InMemoryJobQueue {
    pub fn new(retry_delay: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender: Mutex::new(Some(sender)),
            receiver: AsyncMutex::new(receiver),
            dead_letters: Arc::new(Mutex::new(Vec::new())),
            retry_delay,
        }
    }

    /// Stop accepting new messages.
    ///
    /// Receivers drain what is already queued (including pending retries)
    /// and then see the queue as closed.
    pub fn close(&self) {
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }
    }

    pub fn dead_letters(&self) -> Vec<DeadLetter> {
        self.dead_letters
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    pub fn dead_letter_for(&self, job_id: &JobId) -> Option<DeadLetter> {
        self.dead_letters()
            .into_iter()
            .find(|d| &d.delivery.message.job_id == job_id)
    }

    fn sender(&self) -> Result<mpsc::UnboundedSender<Delivery>, QueueError> {
        self.sender
            .lock()
            .map_err(|_| QueueError::Backend("lock poisoned".into()))?
            .clone()
            .ok_or(QueueError::Closed)
    }
}

#[async_trait]
impl JobQueue for InMemoryJobQueue {
    async fn enqueue(&self, message: QueueMessage) -> Result<(), QueueError> {
        debug!("Enqueued job {}", message.job_id);
        self.sender()?
            .send(Delivery::first(message))
            .map_err(|_| QueueError::Closed)
    }

    async fn receive(&self) -> Option<Delivery> {
        self.receiver.lock().await.recv().await
    }

    async fn ack(&self, delivery: &Delivery) -> Result<(), QueueError> {
        debug!(
            "Acked job {} (attempt {})",
            delivery.message.job_id, delivery.attempt
        );
        Ok(())
    }

    async fn retry(&self, delivery: &Delivery) -> Result<(), QueueError> {
        let sender = self.sender()?;
        let next = Delivery {
            message: delivery.message.clone(),
            attempt: delivery.attempt + 1,
        };
        let delay = self.retry_delay;
        debug!(
            "Redelivering job {} in {:?} (attempt {})",
            next.message.job_id, delay, next.attempt
        );

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(next).is_err() {
                warn!("Queue closed before a retry could be delivered");
            }
        });
        Ok(())
    }

    async fn dead_letter(&self, delivery: &Delivery, reason: &str) -> Result<(), QueueError> {
        warn!(
            "Dead-lettered job {} after attempt {}: {}",
            delivery.message.job_id, delivery.attempt, reason
        );
        self.dead_letters
            .lock()
            .map_err(|_| QueueError::Backend("lock poisoned".into()))?
            .push(DeadLetter {
                delivery: delivery.clone(),
                reason: reason.to_string(),
            });
        Ok(())
    }
}
