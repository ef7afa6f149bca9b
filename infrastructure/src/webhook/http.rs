//! HTTP webhook notifier

use async_trait::async_trait;
use council_application::{WebhookError, WebhookNotifier};
use council_domain::WebhookPayload;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// POSTs the payload as JSON; any non-2xx answer is an error
pub struct HttpWebhookNotifier {
    client: Client,
}

impl HttpWebhookNotifier {
    pub fn new(timeout: Duration) -> Result<Self, WebhookError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WebhookError::RequestFailed(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookNotifier for HttpWebhookNotifier {
    async fn notify(&self, url: &str, payload: &WebhookPayload) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| WebhookError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status(status.as_u16()));
        }
        debug!("Webhook {} accepted ({})", url, status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use council_domain::{Job, JobId};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn failed_payload() -> WebhookPayload {
        let mut job = Job::queued(JobId::parse("job-9").unwrap(), None, Utc::now());
        job.begin_attempt(Utc::now()).unwrap();
        job.fail(Utc::now(), "provider returned 502").unwrap();
        WebhookPayload::for_job(&job, None)
    }

    #[tokio::test]
    async fn test_posts_payload() {
        let server = MockServer::start().await;
        let payload = failed_payload();
        Mock::given(method("POST"))
            .and(path("/hooks/council"))
            .and(body_json(json!({
                "job_id": "job-9",
                "status": "failed",
                "failed_at": payload.failed_at,
                "error": "provider returned 502"
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = HttpWebhookNotifier::new(Duration::from_secs(5)).unwrap();
        notifier
            .notify(&format!("{}/hooks/council", server.uri()), &payload)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = HttpWebhookNotifier::new(Duration::from_secs(5)).unwrap();
        let err = notifier
            .notify(&server.uri(), &failed_payload())
            .await
            .unwrap_err();
        assert!(matches!(err, WebhookError::Status(500)));
    }
}
