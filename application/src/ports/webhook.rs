//! Webhook notification port

use async_trait::async_trait;
use council_domain::WebhookPayload;
use thiserror::Error;

/// Errors that can occur while delivering a webhook
#[derive(Error, Debug)]
pub enum WebhookError {
    #[error("Webhook request failed: {0}")]
    RequestFailed(String),

    #[error("Webhook endpoint returned status {0}")]
    Status(u16),
}

/// Delivers job notifications.
///
/// Callers treat delivery as best-effort: errors are logged, never
/// propagated into job state.
#[async_trait]
pub trait WebhookNotifier: Send + Sync {
    async fn notify(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError>;
}

/// Notifier that drops every notification
pub struct NoWebhook;

#[async_trait]
impl WebhookNotifier for NoWebhook {
    async fn notify(&self, _url: &str, _payload: &WebhookPayload) -> Result<(), WebhookError> {
        Ok(())
    }
}
