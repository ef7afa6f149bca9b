//! Job subdomain
//!
//! - [`entities::Job`]: status record for one submitted review
//! - [`message::QueueMessage`]: what ingress hands to the dispatcher
//! - [`notification::WebhookPayload`]: completion/failure notification body

pub mod entities;
pub mod message;
pub mod notification;

pub use entities::{Job, JobId, JobStatus};
pub use message::{BlobKey, BlobKind, QueueMessage};
pub use notification::{WebhookPayload, is_valid_webhook_url};
