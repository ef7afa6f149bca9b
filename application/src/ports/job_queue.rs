//! Job queue port
//!
//! At-least-once delivery of [`QueueMessage`]s from ingress to workers. The
//! queue owns the attempt counter; the dispatcher decides between retry and
//! dead-letter based on it.

use async_trait::async_trait;
use council_domain::QueueMessage;
use thiserror::Error;

/// Errors that can occur during queue operations
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Queue closed")]
    Closed,

    #[error("Queue backend error: {0}")]
    Backend(String),
}

/// One delivery of a message to a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub message: QueueMessage,
    /// 1-based attempt number of this delivery
    pub attempt: u32,
}

impl Delivery {
    pub fn first(message: QueueMessage) -> Self {
        Self {
            message,
            attempt: 1,
        }
    }
}

#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue a new message (attempt 1)
    async fn enqueue(&self, message: QueueMessage) -> Result<(), QueueError>;

    /// Wait for the next delivery; `None` once the queue is closed and drained
    async fn receive(&self) -> Option<Delivery>;

    /// Acknowledge successful processing
    async fn ack(&self, delivery: &Delivery) -> Result<(), QueueError>;

    /// Schedule redelivery with the attempt counter incremented
    async fn retry(&self, delivery: &Delivery) -> Result<(), QueueError>;

    /// Move a message to the dead-letter path; it is never redelivered
    async fn dead_letter(&self, delivery: &Delivery, reason: &str) -> Result<(), QueueError>;
}
